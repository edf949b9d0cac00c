//! Calendar arithmetic.
//!
//! Contract and trial terms are measured in calendar months and years, not
//! fixed day counts. When the target month is shorter, the day is clamped to
//! the last day of that month (Jan 31 + 1 month = Feb 28/29).

use chrono::{DateTime, Months, Utc};

/// Adds `months` calendar months to `at`. Returns `None` on overflow.
#[must_use]
pub fn add_months(at: DateTime<Utc>, months: u32) -> Option<DateTime<Utc>> {
    at.checked_add_months(Months::new(months))
}

/// Adds `years` calendar years to `at`. Returns `None` on overflow.
#[must_use]
pub fn add_years(at: DateTime<Utc>, years: u32) -> Option<DateTime<Utc>> {
    years.checked_mul(12).and_then(|months| add_months(at, months))
}
