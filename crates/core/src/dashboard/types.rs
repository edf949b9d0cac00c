//! Dashboard data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::payment::{Payment, PaymentStatus};
use crate::school::{School, SchoolStatus};
use crate::subscription::Subscription;

/// Counts and revenue shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// All schools.
    pub total_schools: usize,
    /// Schools awaiting review.
    pub pending_schools: usize,
    /// Approved schools.
    pub approved_schools: usize,
    /// All subscriptions.
    pub total_subscriptions: usize,
    /// Active and trial subscriptions.
    pub active_subscriptions: usize,
    /// Pending and paid subscriptions.
    pub pending_subscriptions: usize,
    /// Completed payment volume in rupees.
    pub total_revenue: Decimal,
    /// All payments.
    pub total_payments: usize,
}

impl DashboardStats {
    /// Aggregates the current records.
    #[must_use]
    pub fn compute(schools: &[School], subscriptions: &[Subscription], payments: &[Payment]) -> Self {
        let count_schools =
            |status: SchoolStatus| schools.iter().filter(|s| s.status == status).count();

        let revenue_paise: i128 = payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Completed)
            .map(|p| i128::from(p.amount))
            .sum();

        Self {
            total_schools: schools.len(),
            pending_schools: count_schools(SchoolStatus::Pending),
            approved_schools: count_schools(SchoolStatus::Approved),
            total_subscriptions: subscriptions.len(),
            active_subscriptions: subscriptions
                .iter()
                .filter(|s| s.status.grants_access())
                .count(),
            pending_subscriptions: subscriptions
                .iter()
                .filter(|s| s.status.awaits_admin())
                .count(),
            total_revenue: Decimal::try_from_i128_with_scale(revenue_paise, 2)
                .unwrap_or(Decimal::MAX),
            total_payments: payments.len(),
        }
    }
}
