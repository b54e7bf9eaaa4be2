//! # till-db: SQLite Persistence for Till
//!
//! Owns the connection pool, embedded migrations and one repository per
//! aggregate. Multi-row workflows - creating a sale (stock decrements plus
//! sale plus lines), deleting a sale (restock plus cascade), and the
//! end-of-day attendance close - run inside a single transaction so partial
//! state is never observable.
//!
//! ## Layout
//! - [`pool`] - `DbConfig` and the [`Database`] handle
//! - [`migrations`] - embedded SQL migrations
//! - [`repository`] - users, categories, items, batches, attendance,
//!   sales, reports, company settings
//! - [`error`] - [`DbError`] including domain conflicts surfaced from
//!   transactional workflows (insufficient stock, no open session)

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
