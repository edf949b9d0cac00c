//! Static product catalogue.
//!
//! Prices are whole rupees per student. A zero price marks a product that is
//! listed but not yet sold.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::lifecycle::LifecycleError;

/// How a product's per-student price accrues over a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Billing {
    /// Charged once per student for the whole contract.
    OneTime,
    /// Charged per student for every month of the contract.
    Monthly,
}

/// A catalogue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Product {
    /// Stable product identifier used by clients.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Price per student in rupees.
    pub price: i64,
    /// Human-readable pricing unit.
    pub unit: &'static str,
    /// Billing basis.
    pub billing: Billing,
}

impl Product {
    /// Returns true if the product can be subscribed to.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.price > 0
    }

    /// Number of billable periods in a contract of `contract_years`.
    #[must_use]
    pub fn billable_periods(&self, contract_years: u32) -> Option<i64> {
        match self.billing {
            Billing::OneTime => Some(1),
            Billing::Monthly => i64::from(contract_years).checked_mul(12),
        }
    }
}

/// Flat-fee product billed once per student.
pub const SCHOOL_SAFAL: &str = "school-safal";

/// The full catalogue, in display order.
pub const CATALOGUE: [Product; 5] = [
    Product {
        id: "parikshanai-questionbank",
        name: "ParikshanAI + Question Bank",
        price: 10,
        unit: "per student/month",
        billing: Billing::Monthly,
    },
    Product {
        id: SCHOOL_SAFAL,
        name: "School SAFAL",
        price: 2,
        unit: "per student",
        billing: Billing::OneTime,
    },
    Product {
        id: "siteforgeai",
        name: "SiteForgeAI",
        price: 0,
        unit: "coming soon",
        billing: Billing::Monthly,
    },
    Product {
        id: "patashala-erp",
        name: "Patashala ERP",
        price: 0,
        unit: "coming soon",
        billing: Billing::Monthly,
    },
    Product {
        id: "connecto",
        name: "Connecto",
        price: 0,
        unit: "coming soon",
        billing: Billing::Monthly,
    },
];

/// Looks up a product by id.
#[must_use]
pub fn find(id: &str) -> Option<&'static Product> {
    CATALOGUE.iter().find(|p| p.id == id)
}

/// Looks up a product that can be sold.
///
/// # Errors
///
/// Returns `UnknownProduct` for ids outside the catalogue and
/// `ProductUnavailable` for "coming soon" entries.
pub fn find_available(id: &str) -> Result<&'static Product, LifecycleError> {
    let product = find(id).ok_or_else(|| LifecycleError::UnknownProduct(id.to_string()))?;
    if !product.is_available() {
        return Err(LifecycleError::ProductUnavailable(id.to_string()));
    }
    Ok(product)
}

/// Serializes the catalogue as `{ "<id>": { name, price, unit } }` in catalogue order.
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingTable;

#[derive(Serialize)]
struct PriceEntry {
    name: &'static str,
    price: i64,
    unit: &'static str,
}

impl Serialize for PricingTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(CATALOGUE.len()))?;
        for product in &CATALOGUE {
            map.serialize_entry(
                product.id,
                &PriceEntry {
                    name: product.name,
                    price: product.price,
                    unit: product.unit,
                },
            )?;
        }
        map.end()
    }
}
