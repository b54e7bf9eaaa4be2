//! # Validation Module
//!
//! Input validation rules shared by every write path.
//!
//! Handlers validate request payloads here before touching the database;
//! the database then enforces its own NOT NULL / UNIQUE / CHECK constraints
//! as a second line of defense.

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a username: non-empty, 3..=50 characters.
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field: "username" });
    }
    if trimmed.len() < 3 {
        return Err(ValidationError::TooShort { field: "username", min: 3 });
    }
    if trimmed.len() > 50 {
        return Err(ValidationError::TooLong { field: "username", max: 50 });
    }
    Ok(())
}

/// Validates an email address. A full RFC parse is deliberately out of
/// scope; this catches the obviously broken input.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field: "email" });
    }
    let valid = trimmed.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
    });
    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email",
            reason: "expected name@domain".to_string(),
        });
    }
    Ok(())
}

/// Validates a plaintext password before hashing: at least 6 characters.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required { field: "password" });
    }
    if password.len() < 6 {
        return Err(ValidationError::TooShort { field: "password", min: 6 });
    }
    Ok(())
}

/// Validates a display name (user full name, item name, category name).
pub fn validate_name(field: &'static str, name: &str) -> ValidationResult<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field });
    }
    if trimmed.len() > 200 {
        return Err(ValidationError::TooLong { field, max: 200 });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale line quantity: at least 1.
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 1 {
        return Err(ValidationError::MustBePositive { field: "quantity" });
    }
    Ok(())
}

/// Validates a unit or line price: strictly positive.
pub fn validate_price(field: &'static str, price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive { field });
    }
    Ok(())
}

/// Validates a stock level: zero or more.
pub fn validate_stock_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 0 {
        return Err(ValidationError::MustNotBeNegative { field: "stockQuantity" });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        assert!(validate_username("admin").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("ab").is_err());
        assert!(validate_username(&"x".repeat(51)).is_err());
    }

    #[test]
    fn email_rules() {
        assert!(validate_email("admin@till.local").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@nodomain").is_err());
        assert!(validate_email("name@nodot").is_err());
    }

    #[test]
    fn password_rules() {
        assert!(validate_password("secret1").is_ok());
        assert!(validate_password("").is_err());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn quantity_rules() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
    }

    #[test]
    fn price_rules() {
        assert!(validate_price("unitPrice", Money::from_cents(1)).is_ok());
        assert!(validate_price("unitPrice", Money::zero()).is_err());
        assert!(validate_price("unitPrice", Money::from_cents(-100)).is_err());
    }

    #[test]
    fn stock_rules() {
        assert!(validate_stock_quantity(0).is_ok());
        assert!(validate_stock_quantity(10).is_ok());
        assert!(validate_stock_quantity(-1).is_err());
    }
}
