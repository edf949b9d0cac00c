//! Subscription quoting and status transitions.

use chrono::{DateTime, Utc};
use smartgen_shared::types::SchoolId;

use crate::lifecycle::{LifecycleError, add_months, add_years};
use crate::pricing::{self, Product};
use crate::subscription::types::{
    NewSubscription, Subscription, SubscriptionPatch, SubscriptionStatus,
};

/// Allowed trial lengths in months.
pub const TRIAL_MONTHS: std::ops::RangeInclusive<i64> = 1..=3;

/// A validated price for a new subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    /// The priced product.
    pub product: &'static Product,
    /// Students covered.
    pub student_count: u32,
    /// Contract term.
    pub contract_years: u32,
    /// Contract total in rupees.
    pub total_amount: i64,
}

impl Quote {
    /// Turns the quote into store input for `school_id`.
    #[must_use]
    pub fn into_new_subscription(self, school_id: SchoolId) -> NewSubscription {
        NewSubscription {
            school_id,
            product_type: self.product.id.to_string(),
            price_per_student: self.product.price,
            student_count: self.student_count,
            total_amount: self.total_amount,
            contract_years: self.contract_years,
        }
    }
}

/// Stateless service for the subscription state machine.
pub struct SubscriptionService;

impl SubscriptionService {
    /// Price a subscription request.
    ///
    /// `total = price × students × periods`, where periods is 1 for flat-fee
    /// products and `contract_years × 12` for monthly ones.
    pub fn quote(
        product_type: &str,
        student_count: i64,
        contract_years: Option<i64>,
    ) -> Result<Quote, LifecycleError> {
        let product = pricing::find_available(product_type)?;

        let student_count = u32::try_from(student_count)
            .ok()
            .filter(|count| *count >= 1)
            .ok_or(LifecycleError::InvalidStudentCount(student_count))?;

        let years = contract_years.unwrap_or(1);
        let contract_years = u32::try_from(years)
            .ok()
            .filter(|years| *years >= 1)
            .ok_or(LifecycleError::InvalidContractYears(years))?;

        let total_amount = product
            .billable_periods(contract_years)
            .and_then(|periods| {
                product
                    .price
                    .checked_mul(i64::from(student_count))?
                    .checked_mul(periods)
            })
            .ok_or(LifecycleError::AmountOverflow)?;

        Ok(Quote {
            product,
            student_count,
            contract_years,
            total_amount,
        })
    }

    /// Admin approval: activates the subscription for its full contract.
    pub fn approve(
        current: &Subscription,
        now: DateTime<Utc>,
    ) -> Result<SubscriptionPatch, LifecycleError> {
        Self::guard(current.status, SubscriptionStatus::Active)?;
        let end_date =
            add_years(now, current.contract_years).ok_or(LifecycleError::DateOverflow)?;

        Ok(SubscriptionPatch {
            status: Some(SubscriptionStatus::Active),
            approved_by_admin: Some(true),
            approved_at: Some(now),
            start_date: Some(now),
            end_date: Some(end_date),
            ..SubscriptionPatch::default()
        })
    }

    /// Admin trial grant for `months` calendar months. `endDate` is left as is.
    pub fn grant_trial(
        current: &Subscription,
        months: i64,
        now: DateTime<Utc>,
    ) -> Result<SubscriptionPatch, LifecycleError> {
        if !TRIAL_MONTHS.contains(&months) {
            return Err(LifecycleError::InvalidTrialLength(months));
        }
        Self::guard(current.status, SubscriptionStatus::Trial)?;

        let months = u32::try_from(months).map_err(|_| LifecycleError::InvalidTrialLength(months))?;
        let trial_end = add_months(now, months).ok_or(LifecycleError::DateOverflow)?;

        Ok(SubscriptionPatch {
            status: Some(SubscriptionStatus::Trial),
            is_trial_active: Some(true),
            trial_end_date: Some(trial_end),
            approved_by_admin: Some(true),
            approved_at: Some(now),
            start_date: Some(now),
            ..SubscriptionPatch::default()
        })
    }

    /// Admin revocation. Allowed from every status, including revoked.
    #[must_use]
    pub fn revoke(_current: &Subscription) -> SubscriptionPatch {
        SubscriptionPatch {
            status: Some(SubscriptionStatus::Revoked),
            approved_by_admin: Some(false),
            ..SubscriptionPatch::default()
        }
    }

    /// Verified payment. Only pending or paid subscriptions move to paid;
    /// anything an admin already acted on keeps its status.
    #[must_use]
    pub fn mark_paid(current: &Subscription) -> SubscriptionPatch {
        if Self::is_valid_transition(current.status, SubscriptionStatus::Paid) {
            SubscriptionPatch {
                status: Some(SubscriptionStatus::Paid),
                ..SubscriptionPatch::default()
            }
        } else {
            SubscriptionPatch::default()
        }
    }

    fn guard(from: SubscriptionStatus, to: SubscriptionStatus) -> Result<(), LifecycleError> {
        if Self::is_valid_transition(from, to) {
            Ok(())
        } else {
            Err(LifecycleError::InvalidSubscriptionTransition { from, to })
        }
    }

    /// Check if a subscription status transition is allowed.
    ///
    /// Admin actions (approve, trial, revoke) apply to any live subscription
    /// and may be repeated. Revoked is terminal apart from re-revoking. Only
    /// a verified payment moves a subscription to paid, and only before an
    /// admin has acted on it.
    #[must_use]
    pub fn is_valid_transition(from: SubscriptionStatus, to: SubscriptionStatus) -> bool {
        use SubscriptionStatus::{Active, Paid, Pending, Revoked, Trial};

        matches!(
            (from, to),
            (Pending | Paid, Paid)
                | (Pending | Paid | Active | Trial, Active | Trial)
                | (_, Revoked)
        )
    }
}
