//! # Money Module
//!
//! Monetary values in integer cents and VAT rates in basis points.
//!
//! ## Why Integer Money?
//! ```text
//!   In floating point:  0.1 + 0.2 = 0.30000000000000004
//!   In integer cents:   10 + 20 = 30
//! ```
//! Every monetary value in the system - item prices, line totals, VAT
//! amounts, report sums - flows through [`Money`]. The database, the API
//! and all calculations use cents; only a UI converts for display.
//!
//! ## VAT Model
//! Prices are VAT-inclusive (EU model). The VAT contained in a gross price
//! is extracted with `gross * rate / (100% + rate)`, rounded half-up, and
//! the net price is whatever remains, so `vat + net == gross` holds exactly
//! for every line.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::DEFAULT_VAT_RATE_BPS;

// =============================================================================
// VAT Rate
// =============================================================================

/// VAT rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 2300 bps = 23.00% (the Irish standard rate).
/// Basis points keep rate arithmetic in integers end to end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct VatRate(u32);

impl VatRate {
    /// Creates a VAT rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        VatRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero VAT rate.
    #[inline]
    pub const fn zero() -> Self {
        VatRate(0)
    }

    /// Resolves the effective rate for an item: the explicit rate if one was
    /// provided, else the category's rate, else the flat default of 23.00%.
    pub fn resolve(explicit: Option<VatRate>, category: Option<VatRate>) -> VatRate {
        explicit
            .or(category)
            .unwrap_or(VatRate(DEFAULT_VAT_RATE_BPS))
    }
}

/// The default rate is the flat 23.00% fallback, not zero.
impl Default for VatRate {
    fn default() -> Self {
        VatRate(DEFAULT_VAT_RATE_BPS)
    }
}

impl fmt::Display for VatRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (euro cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: allows negative values for refunds and adjustments
/// - **Single-field tuple struct**: zero-cost abstraction over i64
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is strictly positive.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Multiplies a unit price by a quantity, giving a line total.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Extracts the VAT contained in this gross (VAT-inclusive) amount.
    ///
    /// Formula: `gross * rate / (100% + rate)`, rounded half-up.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::{Money, VatRate};
    ///
    /// let gross = Money::from_cents(1230); // EUR 12.30 incl. 23% VAT
    /// let vat = gross.vat_portion(VatRate::from_bps(2300));
    /// assert_eq!(vat.cents(), 230); // EUR 2.30 of VAT, EUR 10.00 net
    /// ```
    pub fn vat_portion(&self, rate: VatRate) -> Money {
        if rate.bps() == 0 {
            return Money::zero();
        }
        // i128 keeps the intermediate product safe from overflow.
        // Half-up rounding: (2 * gross * bps + d) / (2 * d) with d = 10000 + bps.
        let d = 10_000i128 + rate.bps() as i128;
        let vat = (2 * self.0 as i128 * rate.bps() as i128 + d) / (2 * d);
        Money(vat as i64)
    }

    /// Returns the net (VAT-exclusive) part of this gross amount.
    ///
    /// Defined as `gross - vat_portion`, so the two always sum back to the
    /// gross amount exactly.
    #[inline]
    pub fn excluding_vat(&self, rate: VatRate) -> Money {
        *self - self.vat_portion(rate)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly display. UI formatting and localization happen elsewhere.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}\u{20ac}{}.{:02}", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_cents_roundtrip() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "\u{20ac}10.99");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-\u{20ac}5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "\u{20ac}0.00");
    }

    #[test]
    fn arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
        assert_eq!(Money::from_cents(250).multiply_quantity(3).cents(), 750);
    }

    #[test]
    fn sum_of_lines() {
        let lines = [Money::from_cents(750), Money::from_cents(1230), Money::from_cents(20)];
        let total: Money = lines.into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn vat_portion_exact() {
        // EUR 12.30 gross at 23% -> exactly EUR 2.30 VAT / EUR 10.00 net
        let gross = Money::from_cents(1230);
        let rate = VatRate::from_bps(2300);
        assert_eq!(gross.vat_portion(rate).cents(), 230);
        assert_eq!(gross.excluding_vat(rate).cents(), 1000);
    }

    #[test]
    fn vat_portion_rounds_half_up() {
        // 750 * 2300 / 12300 = 140.24... -> 140
        assert_eq!(
            Money::from_cents(750).vat_portion(VatRate::from_bps(2300)).cents(),
            140
        );
        // 100 * 1350 / 11350 = 11.89... -> 12 (13.5% reduced rate)
        assert_eq!(
            Money::from_cents(100).vat_portion(VatRate::from_bps(1350)).cents(),
            12
        );
    }

    #[test]
    fn vat_plus_net_equals_gross() {
        let rates = [0u32, 900, 1350, 2300];
        for bps in rates {
            let rate = VatRate::from_bps(bps);
            for cents in [1, 99, 100, 750, 12345, 99999] {
                let gross = Money::from_cents(cents);
                assert_eq!(
                    gross.vat_portion(rate) + gross.excluding_vat(rate),
                    gross,
                    "vat + net must equal gross for {cents} cents at {bps} bps"
                );
            }
        }
    }

    #[test]
    fn zero_rate_has_no_vat() {
        let gross = Money::from_cents(999);
        assert_eq!(gross.vat_portion(VatRate::zero()).cents(), 0);
        assert_eq!(gross.excluding_vat(VatRate::zero()), gross);
    }

    #[test]
    fn resolve_precedence() {
        let explicit = Some(VatRate::from_bps(900));
        let category = Some(VatRate::from_bps(1350));

        assert_eq!(VatRate::resolve(explicit, category).bps(), 900);
        assert_eq!(VatRate::resolve(None, category).bps(), 1350);
        assert_eq!(VatRate::resolve(None, None).bps(), 2300);
    }

    #[test]
    fn rate_display() {
        assert_eq!(format!("{}", VatRate::from_bps(2300)), "23.00%");
        assert_eq!(format!("{}", VatRate::from_bps(1350)), "13.50%");
    }
}
