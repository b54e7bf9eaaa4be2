//! # Worked Hours Module
//!
//! Attendance arithmetic: worked hours in integer hundredths and ISO week
//! boundaries.
//!
//! Total hours on an attendance record are defined as the whole minutes
//! between time-in and time-out, divided by 60 and rounded half-up to two
//! decimals. Keeping the value in hundredths of an hour (an i64, like
//! [`crate::Money`] keeps cents) makes sums over a week exact and
//! float-free; only the JSON boundary converts to a decimal number.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

// =============================================================================
// Worked Hours
// =============================================================================

/// Worked time in hundredths of an hour (850 = 8.50 h).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct WorkedHours(i64);

impl WorkedHours {
    /// Creates a value from hundredths of an hour.
    #[inline]
    pub const fn from_centi(centi: i64) -> Self {
        WorkedHours(centi)
    }

    /// Returns the value in hundredths of an hour.
    #[inline]
    pub const fn centi(&self) -> i64 {
        self.0
    }

    /// Zero hours.
    #[inline]
    pub const fn zero() -> Self {
        WorkedHours(0)
    }

    /// Returns the value as fractional hours, for display and JSON.
    #[inline]
    pub fn as_hours(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Computes the hours worked between time-in and time-out.
    ///
    /// Whole minutes only, rounded half-up to two decimals. `time_out` must
    /// not precede `time_in`; callers validate that ordering first.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveTime;
    /// use till_core::hours::WorkedHours;
    ///
    /// let time_in = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
    /// let time_out = NaiveTime::from_hms_opt(17, 30, 0).unwrap();
    /// assert_eq!(WorkedHours::between(time_in, time_out).centi(), 850);
    /// ```
    pub fn between(time_in: NaiveTime, time_out: NaiveTime) -> WorkedHours {
        let minutes = (time_out - time_in).num_minutes();
        // Half-up rounding of minutes * 100 / 60 in pure integer math.
        WorkedHours((minutes * 100 + 30) / 60)
    }
}

impl Add for WorkedHours {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        WorkedHours(self.0 + other.0)
    }
}

impl AddAssign for WorkedHours {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl std::iter::Sum for WorkedHours {
    fn sum<I: Iterator<Item = WorkedHours>>(iter: I) -> WorkedHours {
        iter.fold(WorkedHours::zero(), Add::add)
    }
}

impl fmt::Display for WorkedHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, (self.0 % 100).abs())
    }
}

/// JSON carries hours as a 2-decimal number (8.5), not raw hundredths.
impl Serialize for WorkedHours {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_hours())
    }
}

impl<'de> Deserialize<'de> for WorkedHours {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hours = f64::deserialize(deserializer)?;
        Ok(WorkedHours((hours * 100.0).round() as i64))
    }
}

// =============================================================================
// Week Boundaries
// =============================================================================

/// Returns the Monday on or before `date` (ISO week, Monday-first).
///
/// Weekly reports cover the closed range `[week_start, week_start + 6]`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Returns the last day (Sunday) of the week starting at `week_start`.
pub fn week_end(week_start: NaiveDate) -> NaiveDate {
    week_start + Duration::days(6)
}

// =============================================================================
// Unit Tests
// =============================================================================
