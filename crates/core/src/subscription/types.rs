//! Subscription domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smartgen_shared::types::{SchoolId, SubscriptionId};
use std::fmt;

/// Subscription status in the lifecycle.
///
/// The valid transitions are:
/// - Pending → Paid (payment verified)
/// - Pending | Paid | Trial → Active (admin approve)
/// - Pending | Paid → Trial (admin grants a trial)
/// - any → Revoked (admin revoke)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    /// Created, awaiting payment.
    Pending,
    /// Payment verified, awaiting admin approval.
    Paid,
    /// Approved and running.
    Active,
    /// Running on a time-boxed trial.
    Trial,
    /// Access withdrawn.
    Revoked,
}

impl SubscriptionStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Active => "active",
            Self::Trial => "trial",
            Self::Revoked => "revoked",
        }
    }

    /// Returns true if the school currently has access.
    #[must_use]
    pub fn grants_access(&self) -> bool {
        matches!(self, Self::Active | Self::Trial)
    }

    /// Returns true while the subscription awaits an admin.
    #[must_use]
    pub fn awaits_admin(&self) -> bool {
        matches!(self, Self::Pending | Self::Paid)
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A school's commitment to one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Identifier.
    pub id: SubscriptionId,
    /// Owning school.
    pub school_id: SchoolId,
    /// Product id from the pricing table.
    pub product_type: String,
    /// Price per student in rupees at creation time.
    pub price_per_student: i64,
    /// Students covered.
    pub student_count: u32,
    /// Contract total in rupees, fixed at creation.
    pub total_amount: i64,
    /// Contract term.
    pub contract_years: u32,
    /// Lifecycle status.
    pub status: SubscriptionStatus,
    /// Whether a trial grant is in effect.
    pub is_trial_active: bool,
    /// When the trial ends.
    pub trial_end_date: Option<DateTime<Utc>>,
    /// When access started.
    pub start_date: Option<DateTime<Utc>>,
    /// When the contract ends.
    pub end_date: Option<DateTime<Utc>>,
    /// Whether an admin signed off.
    pub approved_by_admin: bool,
    /// When an admin signed off.
    pub approved_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
    /// Owning school.
    pub school_id: SchoolId,
    /// Product id.
    pub product_type: String,
    /// Price per student in rupees.
    pub price_per_student: i64,
    /// Students covered.
    pub student_count: u32,
    /// Contract total in rupees.
    pub total_amount: i64,
    /// Contract term.
    pub contract_years: u32,
}

impl NewSubscription {
    /// Builds the stored record with lifecycle defaults.
    #[must_use]
    pub fn into_subscription(self, id: SubscriptionId, created_at: DateTime<Utc>) -> Subscription {
        Subscription {
            id,
            school_id: self.school_id,
            product_type: self.product_type,
            price_per_student: self.price_per_student,
            student_count: self.student_count,
            total_amount: self.total_amount,
            contract_years: self.contract_years,
            status: SubscriptionStatus::Pending,
            is_trial_active: false,
            trial_end_date: None,
            start_date: None,
            end_date: None,
            approved_by_admin: false,
            approved_at: None,
            created_at,
        }
    }
}

/// Partial update of a subscription.
///
/// Pricing fields are deliberately absent: the quote is immutable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubscriptionPatch {
    /// New status.
    pub status: Option<SubscriptionStatus>,
    /// Trial flag.
    pub is_trial_active: Option<bool>,
    /// Trial end.
    pub trial_end_date: Option<DateTime<Utc>>,
    /// Access start.
    pub start_date: Option<DateTime<Utc>>,
    /// Contract end.
    pub end_date: Option<DateTime<Utc>>,
    /// Admin sign-off flag.
    pub approved_by_admin: Option<bool>,
    /// Admin sign-off time.
    pub approved_at: Option<DateTime<Utc>>,
}

impl SubscriptionPatch {
    /// Returns true if applying the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns `subscription` with the patch applied.
    #[must_use]
    pub fn apply_to(&self, subscription: &Subscription) -> Subscription {
        let mut next = subscription.clone();
        if let Some(status) = self.status {
            next.status = status;
        }
        if let Some(active) = self.is_trial_active {
            next.is_trial_active = active;
        }
        if let Some(at) = self.trial_end_date {
            next.trial_end_date = Some(at);
        }
        if let Some(at) = self.start_date {
            next.start_date = Some(at);
        }
        if let Some(at) = self.end_date {
            next.end_date = Some(at);
        }
        if let Some(approved) = self.approved_by_admin {
            next.approved_by_admin = approved;
        }
        if let Some(at) = self.approved_at {
            next.approved_at = Some(at);
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Subscription {
        NewSubscription {
            school_id: SchoolId::new(),
            product_type: "school-safal".to_string(),
            price_per_student: 2,
            student_count: 50,
            total_amount: 100,
            contract_years: 1,
        }
        .into_subscription(SubscriptionId::new(), Utc::now())
    }

    #[test]
    fn test_defaults() {
        let sub = sample();
        assert_eq!(sub.status, SubscriptionStatus::Pending);
        assert!(!sub.approved_by_admin);
        assert!(!sub.is_trial_active);
        assert!(sub.start_date.is_none());
        assert!(sub.end_date.is_none());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(SubscriptionStatus::Revoked.to_string(), "revoked");
        assert_eq!(SubscriptionStatus::Trial.to_string(), "trial");
    }

    #[test]
    fn test_access_and_waiting_groups() {
        assert!(SubscriptionStatus::Active.grants_access());
        assert!(SubscriptionStatus::Trial.grants_access());
        assert!(!SubscriptionStatus::Paid.grants_access());
        assert!(SubscriptionStatus::Pending.awaits_admin());
        assert!(SubscriptionStatus::Paid.awaits_admin());
        assert!(!SubscriptionStatus::Revoked.awaits_admin());
    }

    #[test]
    fn test_patch_merges_only_supplied_fields() {
        let sub = sample();
        let now = Utc::now();
        let patched = SubscriptionPatch {
            status: Some(SubscriptionStatus::Trial),
            is_trial_active: Some(true),
            trial_end_date: Some(now),
            ..SubscriptionPatch::default()
        }
        .apply_to(&sub);

        assert_eq!(patched.status, SubscriptionStatus::Trial);
        assert!(patched.is_trial_active);
        assert_eq!(patched.trial_end_date, Some(now));
        assert_eq!(patched.total_amount, sub.total_amount);
        assert_eq!(patched.end_date, None);
        assert!(SubscriptionPatch::default().is_empty());
    }
}
