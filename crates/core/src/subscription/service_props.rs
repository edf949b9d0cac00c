//! Property-based tests for SubscriptionService.

use chrono::{DateTime, Datelike, Utc};
use proptest::prelude::*;
use smartgen_shared::types::{SchoolId, SubscriptionId};

use crate::lifecycle::LifecycleError;
use crate::subscription::service::SubscriptionService;
use crate::subscription::types::{NewSubscription, Subscription, SubscriptionStatus};

fn arb_status() -> impl Strategy<Value = SubscriptionStatus> {
    prop_oneof![
        Just(SubscriptionStatus::Pending),
        Just(SubscriptionStatus::Paid),
        Just(SubscriptionStatus::Active),
        Just(SubscriptionStatus::Trial),
        Just(SubscriptionStatus::Revoked),
    ]
}

/// Instants between 2000-01-01 and 2100-01-01.
fn arb_instant() -> impl Strategy<Value = DateTime<Utc>> {
    (946_684_800_i64..4_102_444_800_i64)
        .prop_map(|secs| DateTime::from_timestamp(secs, 0).unwrap_or_default())
}

fn subscription(status: SubscriptionStatus, contract_years: u32) -> Subscription {
    let mut sub = NewSubscription {
        school_id: SchoolId::new(),
        product_type: "parikshanai-questionbank".to_string(),
        price_per_student: 10,
        student_count: 10,
        total_amount: 1200,
        contract_years,
    }
    .into_subscription(SubscriptionId::new(), Utc::now());
    sub.status = status;
    sub
}

fn month_index(at: DateTime<Utc>) -> i64 {
    i64::from(at.year()) * 12 + i64::from(at.month0())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Flat-fee totals ignore the contract term.
    #[test]
    fn prop_school_safal_total(students in 1_i64..100_000, years in 1_i64..10) {
        let quote = SubscriptionService::quote("school-safal", students, Some(years)).unwrap();
        prop_assert_eq!(quote.total_amount, 2 * students);
    }

    /// Monthly totals multiply by every month of the contract.
    #[test]
    fn prop_monthly_total(students in 1_i64..100_000, years in 1_i64..10) {
        let quote =
            SubscriptionService::quote("parikshanai-questionbank", students, Some(years)).unwrap();
        prop_assert_eq!(quote.total_amount, 10 * students * years * 12);
    }

    /// Trial lengths outside 1..=3 always fail validation.
    #[test]
    fn prop_trial_length_out_of_range_fails(
        months in prop_oneof![i64::MIN..1_i64, 4_i64..i64::MAX],
        status in arb_status(),
        now in arb_instant(),
    ) {
        let sub = subscription(status, 1);
        prop_assert_eq!(
            SubscriptionService::grant_trial(&sub, months, now),
            Err(LifecycleError::InvalidTrialLength(months))
        );
    }

    /// Trial lengths in 1..=3 end exactly that many calendar months later.
    #[test]
    fn prop_trial_end_is_calendar_months(months in 1_i64..=3, now in arb_instant()) {
        let sub = subscription(SubscriptionStatus::Pending, 1);
        let patch = SubscriptionService::grant_trial(&sub, months, now).unwrap();
        let trial_end = patch.trial_end_date.unwrap();

        prop_assert_eq!(month_index(trial_end) - month_index(now), months);
        prop_assert!(trial_end.day() <= now.day());
        prop_assert_eq!(trial_end.time(), now.time());
        prop_assert_eq!(patch.end_date, None);
    }

    /// Approval ends the contract exactly `contract_years` years after it starts.
    #[test]
    fn prop_approve_end_date(years in 1_u32..20, now in arb_instant()) {
        let sub = subscription(SubscriptionStatus::Paid, years);
        let approved = SubscriptionService::approve(&sub, now).unwrap().apply_to(&sub);
        let start = approved.start_date.unwrap();
        let end = approved.end_date.unwrap();

        prop_assert_eq!(start, now);
        prop_assert_eq!(end.year() - start.year(), i32::try_from(years).unwrap());
        prop_assert_eq!(end.month(), start.month());
        prop_assert_eq!(end.time(), start.time());
    }

    /// Revocation always succeeds and always clears the approval flag.
    #[test]
    fn prop_revoke_always_succeeds(status in arb_status()) {
        let sub = subscription(status, 1);
        let revoked = SubscriptionService::revoke(&sub).apply_to(&sub);
        prop_assert_eq!(revoked.status, SubscriptionStatus::Revoked);
        prop_assert!(!revoked.approved_by_admin);
    }

    /// Revoked is terminal except for re-revoking.
    #[test]
    fn prop_revoked_is_terminal(to in arb_status()) {
        prop_assert_eq!(
            SubscriptionService::is_valid_transition(SubscriptionStatus::Revoked, to),
            to == SubscriptionStatus::Revoked
        );
    }
}
