//! Integration tests for the in-memory store.

#![allow(clippy::items_after_statements)]

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use futures::future::join_all;
use smartgen_core::audit::{AuditAction, EntityType, NewAuditLog};
use smartgen_core::clock::{Clock, ManualClock};
use smartgen_core::lifecycle::LifecycleError;
use smartgen_core::document::DocumentService;
use smartgen_core::payment::{
    NewPayment, PaymentPatch, PaymentService, PaymentStatus, generate_order_id,
};
use smartgen_core::school::{NewSchool, SchoolPatch, SchoolService, SchoolStatus};
use smartgen_core::store::{Store, StoreError};
use smartgen_core::subscription::{SubscriptionPatch, SubscriptionService, SubscriptionStatus};
use smartgen_shared::types::{DocumentId, PaymentId, SchoolId, SubscriptionId};
use smartgen_db::MemoryStore;

fn manual_store() -> (Arc<ManualClock>, MemoryStore) {
    let start = Utc.with_ymd_and_hms(2025, 4, 1, 8, 0, 0).unwrap();
    let clock = Arc::new(ManualClock::new(start));
    let store = MemoryStore::with_clock(clock.clone());
    (clock, store)
}

fn new_school(email: &str) -> NewSchool {
    NewSchool {
        name: "Test School".to_string(),
        email: email.to_string(),
        phone: "9999999999".to_string(),
        address: "1 School Road".to_string(),
        city: "Pune".to_string(),
        state: "MH".to_string(),
        pincode: "411001".to_string(),
        principal_name: "Principal".to_string(),
        student_count: 50,
        ..NewSchool::default()
    }
}

#[tokio::test]
async fn test_create_school_stamps_defaults() {
    let (clock, store) = manual_store();
    let school = store.create_school(new_school("t@example.com")).await.unwrap();

    assert_eq!(school.status, SchoolStatus::Pending);
    assert_eq!(school.created_at, clock.now());
    assert_eq!(store.get_school(school.id).await.unwrap(), Some(school.clone()));
    assert_eq!(
        store.find_school_by_email("T@EXAMPLE.COM").await.unwrap(),
        Some(school)
    );
}

#[tokio::test]
async fn test_duplicate_email_rejected_case_insensitively() {
    let store = MemoryStore::new();
    store.create_school(new_school("t@example.com")).await.unwrap();

    let err = store
        .create_school(new_school(" T@Example.com"))
        .await
        .unwrap_err();
    assert_eq!(err, StoreError::DuplicateEmail("t@example.com".to_string()));
    assert_eq!(store.list_schools().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registration_single_winner() {
    let store = Arc::new(MemoryStore::new());

    let handles = (0..32).map(|_| {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.create_school(new_school("race@example.com")).await })
    });
    let results = join_all(handles).await;

    let winners = results
        .into_iter()
        .map(|joined| joined.unwrap())
        .filter(Result::is_ok)
        .count();
    assert_eq!(winners, 1);
    assert_eq!(store.list_schools().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_settlement_applies_once() {
    let store = Arc::new(MemoryStore::new());
    let school = store.create_school(new_school("pay@example.com")).await.unwrap();
    let quote = SubscriptionService::quote("school-safal", 50, None).unwrap();
    let sub = store
        .create_subscription(quote.into_new_subscription(school.id))
        .await
        .unwrap();
    let payment = store
        .create_payment(NewPayment::for_subscription(&sub, generate_order_id(Utc::now())).unwrap())
        .await
        .unwrap();
    let payment_id = payment.id;

    let handles = (0..16).map(|i| {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            let gateway_id = format!("pay_{i}");
            store
                .modify_payment(payment_id, &|current| {
                    PaymentService::complete(current, &gateway_id, "sig", Utc::now())
                })
                .await
        })
    });
    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let completed = results.iter().filter(|r| matches!(r, Ok(Some(_)))).count();
    let refused = results
        .iter()
        .filter(|r| {
            matches!(
                r,
                Err(StoreError::Rejected(LifecycleError::InvalidPaymentTransition { .. }))
            )
        })
        .count();
    assert_eq!(completed, 1);
    assert_eq!(refused, 15);

    let stored = store.get_payment(payment_id).await.unwrap().unwrap();
    assert_eq!(stored.status, PaymentStatus::Completed);
}

#[tokio::test]
async fn test_modify_applies_transition() {
    let (clock, store) = manual_store();
    let school = store.create_school(new_school("m@example.com")).await.unwrap();
    let approved = store
        .modify_school(school.id, &|_| Ok(SchoolService::approve()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(approved.status, SchoolStatus::Approved);

    let sub = store
        .create_subscription(
            SubscriptionService::quote("parikshanai-questionbank", 10, Some(2))
                .unwrap()
                .into_new_subscription(school.id),
        )
        .await
        .unwrap();
    assert_eq!(sub.total_amount, 2400);

    let now = clock.now();
    let active = store
        .modify_subscription(sub.id, &|current| SubscriptionService::approve(current, now))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(active.status, SubscriptionStatus::Active);
    assert_eq!(active.end_date, Some(Utc.with_ymd_and_hms(2027, 4, 1, 8, 0, 0).unwrap()));
}

#[tokio::test]
async fn test_per_school_queries() {
    let store = MemoryStore::new();
    let a = store.create_school(new_school("a@example.com")).await.unwrap();
    let b = store.create_school(new_school("b@example.com")).await.unwrap();

    for school_id in [a.id, a.id, b.id] {
        let new = SubscriptionService::quote("school-safal", 10, None)
            .unwrap()
            .into_new_subscription(school_id);
        let sub = store.create_subscription(new).await.unwrap();
        store
            .create_payment(NewPayment::for_subscription(&sub, "order".to_string()).unwrap())
            .await
            .unwrap();
    }

    assert_eq!(store.subscriptions_for_school(a.id).await.unwrap().len(), 2);
    assert_eq!(store.subscriptions_for_school(b.id).await.unwrap().len(), 1);
    assert_eq!(store.payments_for_school(a.id).await.unwrap().len(), 2);
    assert!(store.documents_for_school(a.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_audit_logs_newest_first() {
    let (clock, store) = manual_store();

    let first = store
        .append_audit_log(NewAuditLog::new(AuditAction::SchoolRegistered, EntityType::School, "1"))
        .await
        .unwrap();
    clock.advance(Duration::seconds(5));
    let second = store
        .append_audit_log(NewAuditLog::new(AuditAction::SchoolApproved, EntityType::School, "1"))
        .await
        .unwrap();
    // Same instant as `second`.
    let third = store
        .append_audit_log(NewAuditLog::new(AuditAction::AdminLogout, EntityType::Admin, "x"))
        .await
        .unwrap();

    let ids: Vec<_> = store
        .list_audit_logs()
        .await
        .unwrap()
        .into_iter()
        .map(|entry| entry.id)
        .collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);
}

#[tokio::test]
async fn test_audit_logs_non_increasing_under_backwards_clock() {
    let (clock, store) = manual_store();
    for step in [10, -3, 7, -20, 1] {
        clock.advance(Duration::seconds(step));
        store
            .append_audit_log(NewAuditLog::new(AuditAction::AdminLogin, EntityType::Admin, step))
            .await
            .unwrap();
    }

    let entries = store.list_audit_logs().await.unwrap();
    assert_eq!(entries.len(), 5);
    assert!(entries.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}

#[tokio::test]
async fn test_update_merges_present_fields_only() {
    let (clock, store) = manual_store();
    let school = store.create_school(new_school("u@example.com")).await.unwrap();

    let updated = store
        .update_school(
            school.id,
            SchoolPatch {
                status: Some(SchoolStatus::Rejected),
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, SchoolStatus::Rejected);
    assert_eq!(updated.email, school.email);
    assert_eq!(store.get_school(school.id).await.unwrap(), Some(updated));

    let sub = store
        .create_subscription(
            SubscriptionService::quote("school-safal", 50, None)
                .unwrap()
                .into_new_subscription(school.id),
        )
        .await
        .unwrap();
    let trial_end = clock.now() + Duration::days(30);
    let updated = store
        .update_subscription(
            sub.id,
            SubscriptionPatch {
                is_trial_active: Some(true),
                trial_end_date: Some(trial_end),
                ..SubscriptionPatch::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert!(updated.is_trial_active);
    assert_eq!(updated.trial_end_date, Some(trial_end));
    assert_eq!(updated.status, SubscriptionStatus::Pending);
    assert_eq!(updated.total_amount, sub.total_amount);
    assert_eq!(store.get_subscription(sub.id).await.unwrap(), Some(updated));

    let payment = store
        .create_payment(NewPayment::for_subscription(&sub, "order_1".to_string()).unwrap())
        .await
        .unwrap();
    let updated = store
        .update_payment(
            payment.id,
            PaymentPatch {
                payment_method: Some("card".to_string()),
                ..PaymentPatch::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.payment_method.as_deref(), Some("card"));
    assert_eq!(updated.status, PaymentStatus::Pending);
    assert_eq!(updated.razorpay_order_id, "order_1");
    assert_eq!(updated.amount, payment.amount);
    assert_eq!(store.get_payment(payment.id).await.unwrap(), Some(updated));
}

#[tokio::test]
async fn test_missing_keys_return_none() {
    let store = MemoryStore::new();

    assert!(store.get_school(SchoolId::new()).await.unwrap().is_none());
    assert!(
        store
            .update_school(SchoolId::new(), SchoolPatch::default())
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        store
            .get_subscription(SubscriptionId::new())
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        store
            .update_subscription(SubscriptionId::new(), SubscriptionPatch::default())
            .await
            .unwrap()
            .is_none()
    );
    assert!(store.get_payment(PaymentId::new()).await.unwrap().is_none());
    assert!(
        store
            .update_payment(PaymentId::new(), PaymentPatch::default())
            .await
            .unwrap()
            .is_none()
    );
    assert!(store.get_document(DocumentId::new()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_document_round_trip() {
    let (clock, store) = manual_store();
    let school = store.create_school(new_school("d@example.com")).await.unwrap();

    let draft = DocumentService::generate("certificate", &school, None, clock.now()).unwrap();
    let document = store.create_document(draft).await.unwrap();

    assert_eq!(document.school_id, school.id);
    assert_eq!(document.subscription_id, None);
    assert_eq!(document.created_at, clock.now());
    assert_eq!(
        store.get_document(document.id).await.unwrap(),
        Some(document.clone())
    );
    assert_eq!(
        store.documents_for_school(school.id).await.unwrap(),
        vec![document]
    );
}
