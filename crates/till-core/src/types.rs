//! # Domain Types
//!
//! Core domain types for the Till back office.
//!
//! ## Type Map
//! ```text
//!   User ──┐
//!          ├── Attendance   clock-in/out sessions, worked hours
//!          └── Sale ─────── SaleItem (snapshot of the item at sale time)
//!                               │
//!   Category ── Item ──────────┘ (optional: quick-sale lines have none)
//!   Batch ──── Item
//! ```
//!
//! ## Identity
//! Every entity carries a numeric `id` assigned by the database. References
//! between entities are plain foreign-key ids resolved through the
//! repositories; there is no lazy loading.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::hours::WorkedHours;
use crate::money::{Money, VatRate};

// =============================================================================
// Role
// =============================================================================

/// Account role. Admins see every user's data; users see their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    User,
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on an external terminal.
    Card,
}

// =============================================================================
// Discount
// =============================================================================

/// How a sale-level discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum DiscountType {
    /// Value is basis points off the subtotal.
    Percentage,
    /// Value is a fixed amount in cents.
    Amount,
}

// =============================================================================
// User
// =============================================================================

/// A staff account. Referenced (never owned) by attendance and sale rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    /// Login name, unique across the system.
    pub username: String,
    /// Contact address, unique across the system.
    pub email: String,
    /// argon2 hash; never serialized to the API.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
    /// Soft-disable flag; inactive users cannot log in.
    pub active: bool,
    /// Pay rate used by payroll exports.
    pub hourly_rate: Money,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// =============================================================================
// Category
// =============================================================================

/// Item grouping; may carry a VAT rate that items inherit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Inherited by items that do not set their own rate.
    pub vat_rate: Option<VatRate>,
    /// Whether the category shows on the POS quick grid.
    pub display_on_pos: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// =============================================================================
// Item
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Gross (VAT-inclusive) unit price.
    pub price: Money,
    /// Current stock level; never negative. Decrements past zero are
    /// rejected by the sale transaction and the stock-adjust endpoint.
    pub stock_quantity: i64,
    /// EAN/UPC barcode, unique when present.
    pub barcode: Option<String>,
    pub category_id: Option<i64>,
    /// Effective VAT rate, resolved at write time:
    /// explicit value, else the category's rate, else 23.00%.
    pub vat_rate: VatRate,
    pub batch_number: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Item {
    /// Checks whether `quantity` units can be sold from current stock.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock_quantity >= quantity
    }
}

// =============================================================================
// Batch
// =============================================================================

/// A delivery batch of an item, tracked for expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub id: i64,
    pub item_id: i64,
    /// Supplier-facing batch label.
    pub batch_id: String,
    pub quantity: i64,
    pub expiry_date: Option<NaiveDate>,
    pub manufacture_date: Option<NaiveDate>,
    pub received_date: Option<NaiveDate>,
    pub supplier_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// =============================================================================
// Attendance
// =============================================================================

/// One clock-in session for a user on a date.
///
/// ## State Machine
/// ```text
///   time-in ──► OPEN (time_out = None)
///                 │ mark_time_out / end-of-day auto-close
///                 ▼
///               CLOSED (time_out set, total_hours computed)
/// ```
/// A session never reopens, and a user may hold several sessions on the
/// same date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: i64,
    pub user_id: i64,
    /// Calendar date of the session; no time-zone conversion anywhere.
    pub attendance_date: NaiveDate,
    pub time_in: NaiveTime,
    /// `None` while the user is still clocked in.
    pub time_out: Option<NaiveTime>,
    /// Set together with `time_out`:
    /// whole minutes / 60, rounded half-up to two decimals.
    pub total_hours: Option<WorkedHours>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Attendance {
    /// An open session has a time-in but no time-out yet.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.time_out.is_none()
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A completed sale transaction. Owns its line items exclusively; deleting
/// the sale cascades to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: i64,
    /// Sum of all line totals.
    pub total_amount: Money,
    /// Line-total sum before any sale-level discount.
    pub subtotal_amount: Money,
    pub discount_amount: Option<Money>,
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<i64>,
    pub sale_date: NaiveDateTime,
    pub payment_method: PaymentMethod,
    /// Cashier, when known. Legacy and anonymous quick sales have none.
    pub user_id: Option<i64>,
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line on a sale.
///
/// Uses the snapshot pattern: the item's name and barcode are frozen onto
/// the line at sale time, so historical receipts stay stable even if the
/// catalog item is later edited or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub id: i64,
    pub sale_id: i64,
    /// `None` for quick-sale lines (generic cash transactions with no
    /// catalog item and no stock effect).
    pub item_id: Option<i64>,
    pub quantity: i64,
    pub unit_price: Money,
    /// `unit_price * quantity`, gross.
    pub total_price: Money,
    /// Item name at sale time (frozen); "Quick Sale" for quick-sale lines.
    pub item_name: String,
    /// Barcode at sale time (frozen).
    pub item_barcode: Option<String>,
    pub batch_id: Option<String>,
    pub vat_rate: VatRate,
    /// VAT contained in `total_price`.
    pub vat_amount: Money,
    /// `total_price - vat_amount`.
    pub price_excluding_vat: Money,
}

// =============================================================================
// Company Settings
// =============================================================================

/// Singleton company record printed on receipts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct CompanySettings {
    pub id: i64,
    pub company_name: String,
    pub address: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_default_is_user() {
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn payment_method_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&PaymentMethod::Cash).unwrap(), "\"CASH\"");
        assert_eq!(serde_json::to_string(&PaymentMethod::Card).unwrap(), "\"CARD\"");
    }

    #[test]
    fn can_sell_respects_stock() {
        let item = Item {
            id: 42,
            name: "Amber Leaf".to_string(),
            description: None,
            price: Money::from_cents(1250),
            stock_quantity: 5,
            barcode: Some("123456789".to_string()),
            category_id: None,
            vat_rate: VatRate::default(),
            batch_number: None,
            expiry_date: None,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        };
        assert!(item.can_sell(5));
        assert!(!item.can_sell(6));
    }
}
