//! Persistence contract.
//!
//! The `Store` trait is the system of record every handler depends on. The
//! db crate provides an in-memory implementation; a durable backend only has
//! to honour the same contract:
//!
//! - lookups of missing keys return `Ok(None)`, never an error
//! - `create_*` assigns a fresh id and stamps `createdAt`
//! - `modify_*` runs the closure and writes its patch while the row is locked,
//!   so concurrent transitions on one record never interleave
//! - `list_audit_logs` is newest first; other lists have no defined order

mod error;

pub use error::{StoreError, StoreResult};

use async_trait::async_trait;
use smartgen_shared::types::{AdminId, DocumentId, PaymentId, SchoolId, SubscriptionId};

use crate::audit::{AuditLog, NewAuditLog};
use crate::auth::{Admin, NewAdmin};
use crate::document::{Document, NewDocument};
use crate::lifecycle::LifecycleError;
use crate::payment::{NewPayment, Payment, PaymentPatch};
use crate::school::{NewSchool, School, SchoolPatch};
use crate::subscription::{NewSubscription, Subscription, SubscriptionPatch};

/// Decides a patch from the current record, or refuses the transition.
pub type Transition<'a, T, P> = &'a (dyn Fn(&T) -> Result<P, LifecycleError> + Send + Sync);

/// Async persistence contract.
#[async_trait]
pub trait Store: Send + Sync {
    // Admins

    /// Creates an admin. Emails are unique.
    async fn create_admin(&self, input: NewAdmin) -> StoreResult<Admin>;
    /// Gets an admin by id.
    async fn get_admin(&self, id: AdminId) -> StoreResult<Option<Admin>>;
    /// Finds an admin by email, case-insensitively.
    async fn find_admin_by_email(&self, email: &str) -> StoreResult<Option<Admin>>;
    /// Lists all admins.
    async fn list_admins(&self) -> StoreResult<Vec<Admin>>;

    // Schools

    /// Registers a school. Fails with `DuplicateEmail` if the email is taken.
    async fn create_school(&self, input: NewSchool) -> StoreResult<School>;
    /// Gets a school by id.
    async fn get_school(&self, id: SchoolId) -> StoreResult<Option<School>>;
    /// Finds a school by email, case-insensitively.
    async fn find_school_by_email(&self, email: &str) -> StoreResult<Option<School>>;
    /// Lists all schools.
    async fn list_schools(&self) -> StoreResult<Vec<School>>;
    /// Merges `patch` into a school.
    async fn update_school(&self, id: SchoolId, patch: SchoolPatch)
    -> StoreResult<Option<School>>;
    /// Atomically applies a transition to a school.
    async fn modify_school(
        &self,
        id: SchoolId,
        transition: Transition<'_, School, SchoolPatch>,
    ) -> StoreResult<Option<School>>;

    // Subscriptions

    /// Creates a pending subscription.
    async fn create_subscription(&self, input: NewSubscription) -> StoreResult<Subscription>;
    /// Gets a subscription by id.
    async fn get_subscription(&self, id: SubscriptionId) -> StoreResult<Option<Subscription>>;
    /// Lists all subscriptions.
    async fn list_subscriptions(&self) -> StoreResult<Vec<Subscription>>;
    /// Lists the subscriptions of one school.
    async fn subscriptions_for_school(&self, school_id: SchoolId)
    -> StoreResult<Vec<Subscription>>;
    /// Merges `patch` into a subscription.
    async fn update_subscription(
        &self,
        id: SubscriptionId,
        patch: SubscriptionPatch,
    ) -> StoreResult<Option<Subscription>>;
    /// Atomically applies a transition to a subscription.
    async fn modify_subscription(
        &self,
        id: SubscriptionId,
        transition: Transition<'_, Subscription, SubscriptionPatch>,
    ) -> StoreResult<Option<Subscription>>;

    // Payments

    /// Creates a pending payment.
    async fn create_payment(&self, input: NewPayment) -> StoreResult<Payment>;
    /// Gets a payment by id.
    async fn get_payment(&self, id: PaymentId) -> StoreResult<Option<Payment>>;
    /// Lists all payments.
    async fn list_payments(&self) -> StoreResult<Vec<Payment>>;
    /// Lists the payments of one school.
    async fn payments_for_school(&self, school_id: SchoolId) -> StoreResult<Vec<Payment>>;
    /// Merges `patch` into a payment.
    async fn update_payment(
        &self,
        id: PaymentId,
        patch: PaymentPatch,
    ) -> StoreResult<Option<Payment>>;
    /// Atomically applies a transition to a payment.
    async fn modify_payment(
        &self,
        id: PaymentId,
        transition: Transition<'_, Payment, PaymentPatch>,
    ) -> StoreResult<Option<Payment>>;

    // Documents

    /// Stores a generated document.
    async fn create_document(&self, input: NewDocument) -> StoreResult<Document>;
    /// Gets a document by id.
    async fn get_document(&self, id: DocumentId) -> StoreResult<Option<Document>>;
    /// Lists all documents.
    async fn list_documents(&self) -> StoreResult<Vec<Document>>;
    /// Lists the documents of one school.
    async fn documents_for_school(&self, school_id: SchoolId) -> StoreResult<Vec<Document>>;

    // Audit log

    /// Appends an audit entry.
    async fn append_audit_log(&self, input: NewAuditLog) -> StoreResult<AuditLog>;
    /// Lists audit entries, newest first.
    async fn list_audit_logs(&self) -> StoreResult<Vec<AuditLog>>;
}
