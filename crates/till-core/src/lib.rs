//! # till-core: Pure Business Logic for Till
//!
//! This crate is the heart of the Till back office. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//!   HTTP API (apps/server)
//!        │  axum handlers, DTOs
//!        ▼
//!   ★ till-core (THIS CRATE) ★
//!        types • money • hours • validation
//!        NO I/O • NO DATABASE • PURE FUNCTIONS
//!        │
//!        ▼
//!   till-db (SQLite queries, migrations, repositories)
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Item, Sale, Attendance, ...)
//! - [`money`] - Money in integer cents and VAT rates in basis points
//! - [`hours`] - Worked hours in integer hundredths, week boundaries
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output, always
//! 2. **Integer arithmetic**: money in cents, VAT in basis points, hours in
//!    hundredths - no floating point in any invariant-bearing computation
//! 3. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example
//!
//! ```rust
//! use till_core::money::{Money, VatRate};
//!
//! // A line of 3 x EUR 2.50 at the default Irish VAT rate of 23%
//! let line_total = Money::from_cents(250).multiply_quantity(3);
//! let vat = line_total.vat_portion(VatRate::default());
//!
//! assert_eq!(line_total.cents(), 750);
//! // 750 * 23 / 123 = 140.24... -> 140 cents of VAT inside the gross price
//! assert_eq!(vat.cents(), 140);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod hours;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use hours::{week_start, WorkedHours};
pub use money::{Money, VatRate};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default VAT rate in basis points (2300 = 23.00%).
///
/// Applied when neither the item nor its category carries an explicit rate,
/// and to quick-sale lines that reference no catalog item at all.
pub const DEFAULT_VAT_RATE_BPS: u32 = 2300;

/// The time-of-day at which open attendance sessions are force-closed.
///
/// The end-of-day scheduler stamps `23:59:00` on every session still open
/// for the current date.
pub fn end_of_day() -> chrono::NaiveTime {
    chrono::NaiveTime::from_hms_opt(23, 59, 0).expect("23:59:00 is a valid time")
}
