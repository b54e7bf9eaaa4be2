//! # Repository Layer
//!
//! One repository per aggregate, each a thin wrapper around the shared
//! pool. Reads are plain queries; multi-row writes (sale create/delete,
//! end-of-day attendance close) open explicit transactions so partial
//! state never commits.
//!
//! ## Conventions
//! - Inserts use `RETURNING *` so the caller gets the row with its
//!   database-assigned id and timestamps in one round trip
//! - `get_*` returns `Ok(None)` for missing rows; mutations return
//!   `DbError::NotFound` when nothing matched
//! - Timestamps are wall-clock local time, like the rest of the system

pub mod attendance;
pub mod batch;
pub mod category;
pub mod item;
pub mod report;
pub mod sale;
pub mod settings;
pub mod user;

pub use attendance::AttendanceRepository;
pub use batch::BatchRepository;
pub use category::CategoryRepository;
pub use item::ItemRepository;
pub use report::ReportRepository;
pub use sale::SaleRepository;
pub use settings::SettingsRepository;
pub use user::UserRepository;

use chrono::NaiveDateTime;

/// Current local wall-clock timestamp for created_at/updated_at columns.
pub(crate) fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

// =============================================================================
// Test Fixtures
// =============================================================================

#[cfg(test)]
pub(crate) mod testutil {
    use crate::pool::{Database, DbConfig};
    use till_core::{Money, Role, VatRate};

    /// Fresh in-memory database with migrations applied.
    pub async fn test_db() -> Database {
        Database::new(DbConfig::in_memory())
            .await
            .expect("in-memory database")
    }

    /// Inserts a staff user and returns its id.
    pub async fn seed_user(db: &Database, username: &str) -> i64 {
        let user = db
            .users()
            .insert(&super::user::NewUser {
                username: username.to_string(),
                email: format!("{username}@example.test"),
                password_hash: "x".to_string(),
                full_name: format!("Test {username}"),
                role: Role::User,
                hourly_rate: Money::from_cents(1200),
            })
            .await
            .expect("seed user");
        user.id
    }

    /// Inserts a catalog item with the given stock and returns its id.
    pub async fn seed_item(db: &Database, name: &str, price_cents: i64, stock: i64) -> i64 {
        let item = db
            .items()
            .insert(&super::item::NewItem {
                name: name.to_string(),
                description: None,
                price: Money::from_cents(price_cents),
                stock_quantity: stock,
                barcode: None,
                category_id: None,
                vat_rate: Some(VatRate::from_bps(2300)),
                batch_number: None,
                expiry_date: None,
            })
            .await
            .expect("seed item");
        item.id
    }
}
