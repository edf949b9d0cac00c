//! Money type in minor currency units.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are stored as integer minor units (paise) and converted to
//! `rust_decimal::Decimal` only for display.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Minor units per major unit (paise per rupee).
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// Represents a monetary amount with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount in the smallest currency unit (paise).
    pub minor_units: i64,
    /// ISO 4217 currency code.
    pub currency: Currency,
}

/// ISO 4217 currency codes supported by the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Indian Rupee
    #[default]
    Inr,
}

impl Money {
    /// Creates a new Money instance from minor units.
    #[must_use]
    pub const fn from_minor(minor_units: i64, currency: Currency) -> Self {
        Self {
            minor_units,
            currency,
        }
    }

    /// Converts a whole major-unit amount into minor units.
    ///
    /// Returns `None` on overflow.
    #[must_use]
    pub fn from_major(major_units: i64, currency: Currency) -> Option<Self> {
        major_units
            .checked_mul(MINOR_UNITS_PER_MAJOR)
            .map(|minor_units| Self::from_minor(minor_units, currency))
    }

    /// Returns the amount in major units as an exact decimal.
    #[must_use]
    pub fn to_major_decimal(&self) -> Decimal {
        Decimal::new(self.minor_units, 2)
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.minor_units == 0
    }
}

impl Currency {
    /// Returns the ISO 4217 code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inr => "INR",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "INR" => Ok(Self::Inr),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}
