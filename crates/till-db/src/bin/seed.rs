//! Seeds a fresh database with the starter data a new shop needs:
//! the admin account, the default categories and a handful of items.
//!
//! Safe to run repeatedly; a database that already has users is left
//! untouched.
//!
//! ```text
//! TILL_DATABASE_PATH=./data/till.db cargo run -p till-db --bin seed
//! ```

use anyhow::{anyhow, Context, Result};
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHasher};
use tracing::{info, warn};

use till_core::{Money, Role, VatRate};
use till_db::repository::category::CategoryFields;
use till_db::repository::item::NewItem;
use till_db::repository::user::NewUser;
use till_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let path = std::env::var("TILL_DATABASE_PATH").unwrap_or_else(|_| "./data/till.db".to_string());

    if let Some(parent) = std::path::Path::new(&path).parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating database directory {}", parent.display()))?;
    }

    let db = Database::new(DbConfig::new(&path)).await?;

    if db.users().count().await? > 0 {
        warn!("Database already seeded, nothing to do");
        return Ok(());
    }

    seed(&db).await?;
    info!("Seed data written to {path}");
    Ok(())
}

async fn seed(db: &Database) -> Result<()> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(b"admin123", &salt)
        .map_err(|e| anyhow!("hashing admin password: {e}"))?
        .to_string();

    let admin = db
        .users()
        .insert(&NewUser {
            username: "admin".to_string(),
            email: "admin@localhost".to_string(),
            password_hash,
            full_name: "Administrator".to_string(),
            role: Role::Admin,
            hourly_rate: Money::zero(),
        })
        .await?;
    info!(id = admin.id, "Created admin account (change the password!)");

    db.categories()
        .insert(&CategoryFields {
            name: "Quick Sale".to_string(),
            description: Some("Generic cash transactions".to_string()),
            vat_rate: None,
            display_on_pos: true,
        })
        .await?;

    let tobacco = db
        .categories()
        .insert(&CategoryFields {
            name: "Tobacco".to_string(),
            description: Some("Cigarettes and rolling tobacco".to_string()),
            vat_rate: Some(VatRate::from_bps(2300)),
            display_on_pos: true,
        })
        .await?;

    let starter_items = [
        ("Amber Leaf", 1250, 50, Some("123456789")),
        ("Marlboro", 850, 30, None),
        ("Camel", 900, 25, None),
    ];

    for (name, price, stock, barcode) in starter_items {
        db.items()
            .insert(&NewItem {
                name: name.to_string(),
                description: None,
                price: Money::from_cents(price),
                stock_quantity: stock,
                barcode: barcode.map(str::to_string),
                category_id: Some(tobacco.id),
                vat_rate: None,
                batch_number: None,
                expiry_date: None,
            })
            .await?;
    }

    info!(items = starter_items.len(), "Catalog seeded");
    Ok(())
}
