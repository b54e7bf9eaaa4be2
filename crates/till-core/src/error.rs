//! # Error Types
//!
//! Domain-specific error types for till-core.
//!
//! ## Error Hierarchy
//! ```text
//!   till-core errors (this file)
//!   ├── CoreError        - business rule violations
//!   └── ValidationError  - input validation failures
//!
//!   till-db errors (separate crate)
//!   └── DbError          - persistence failures, incl. stock conflicts
//!
//!   apps/server
//!   └── ApiError         - what the HTTP client sees (status + message)
//! ```
//!
//! ## Design Principles
//! 1. `thiserror` derive macros, not manual impls
//! 2. Context in the message (names, ids, quantities)
//! 3. Errors are enum variants, never bare strings

use chrono::NaiveTime;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised by the engines.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Not enough stock to cover a sale line.
    ///
    /// Raised before any stock is mutated; the whole sale transaction is
    /// rolled back when a single line trips this.
    #[error("Insufficient stock for item: {name} (available {available}, requested {requested})")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// Time-out earlier than the session's time-in.
    #[error("Time-out cannot be before time-in ({time_in} > {time_out})")]
    TimeOutBeforeTimeIn {
        time_in: NaiveTime,
        time_out: NaiveTime,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation failures, caught before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: &'static str },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: &'static str },

    /// Invalid format (dates, emails, barcodes).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: String,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_stock_message() {
        let err = CoreError::InsufficientStock {
            name: "Amber Leaf".to_string(),
            available: 5,
            requested: 6,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for item: Amber Leaf (available 5, requested 6)"
        );
    }

    #[test]
    fn time_ordering_message() {
        let err = CoreError::TimeOutBeforeTimeIn {
            time_in: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            time_out: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        };
        assert!(err.to_string().contains("Time-out cannot be before time-in"));
    }

    #[test]
    fn validation_converts_to_core_error() {
        let validation_err = ValidationError::Required { field: "username" };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
