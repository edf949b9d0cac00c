//! `dashmap`-backed store.
//!
//! Each entity lives in its own `DashMap`. A `modify_*` call holds the row's
//! shard write lock while the transition closure runs, which serializes
//! concurrent transitions on the same record. Email uniqueness is claimed
//! through a separate index map with the entry API, so two registrations
//! racing on one address cannot both win.

use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use smartgen_core::audit::{AuditLog, NewAuditLog};
use smartgen_core::auth::{Admin, NewAdmin};
use smartgen_core::clock::{Clock, SystemClock};
use smartgen_core::document::{Document, NewDocument};
use smartgen_core::lifecycle::LifecycleError;
use smartgen_core::payment::{NewPayment, Payment, PaymentPatch};
use smartgen_core::school::{NewSchool, School, SchoolPatch, normalize_email};
use smartgen_core::store::{Store, StoreError, StoreResult, Transition};
use smartgen_core::subscription::{NewSubscription, Subscription, SubscriptionPatch};
use smartgen_shared::types::{
    AdminId, AuditLogId, DocumentId, PaymentId, SchoolId, SubscriptionId,
};
use tracing::debug;

/// In-memory system of record.
pub struct MemoryStore {
    clock: Arc<dyn Clock>,
    admins: DashMap<AdminId, Admin>,
    admin_emails: DashMap<String, AdminId>,
    schools: DashMap<SchoolId, School>,
    school_emails: DashMap<String, SchoolId>,
    subscriptions: DashMap<SubscriptionId, Subscription>,
    payments: DashMap<PaymentId, Payment>,
    documents: DashMap<DocumentId, Document>,
    audit_logs: RwLock<Vec<AuditLog>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty store on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store that stamps records from `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            admins: DashMap::new(),
            admin_emails: DashMap::new(),
            schools: DashMap::new(),
            school_emails: DashMap::new(),
            subscriptions: DashMap::new(),
            payments: DashMap::new(),
            documents: DashMap::new(),
            audit_logs: RwLock::new(Vec::new()),
        }
    }
}

fn snapshot<K, V>(table: &DashMap<K, V>) -> Vec<V>
where
    K: Eq + Hash,
    V: Clone,
{
    table.iter().map(|row| row.value().clone()).collect()
}

fn select<K, V>(table: &DashMap<K, V>, keep: impl Fn(&V) -> bool) -> Vec<V>
where
    K: Eq + Hash,
    V: Clone,
{
    table
        .iter()
        .filter(|row| keep(row.value()))
        .map(|row| row.value().clone())
        .collect()
}

fn patch_row<K, V>(table: &DashMap<K, V>, id: &K, apply: impl FnOnce(&V) -> V) -> Option<V>
where
    K: Eq + Hash,
    V: Clone,
{
    let mut row = table.get_mut(id)?;
    let next = apply(&*row);
    *row = next.clone();
    Some(next)
}

fn transition_row<K, V, P>(
    table: &DashMap<K, V>,
    id: &K,
    transition: &(dyn Fn(&V) -> Result<P, LifecycleError> + Send + Sync),
    apply: impl FnOnce(&P, &V) -> V,
) -> StoreResult<Option<V>>
where
    K: Eq + Hash,
    V: Clone,
{
    let Some(mut row) = table.get_mut(id) else {
        return Ok(None);
    };
    let patch = transition(&*row)?;
    let next = apply(&patch, &*row);
    *row = next.clone();
    Ok(Some(next))
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_admin(&self, input: NewAdmin) -> StoreResult<Admin> {
        let admin = input.into_admin(AdminId::new(), self.clock.now());
        match self.admin_emails.entry(admin.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateAdmin(admin.email)),
            Entry::Vacant(slot) => {
                self.admins.insert(admin.id, admin.clone());
                slot.insert(admin.id);
                debug!(admin_id = %admin.id, "Admin created");
                Ok(admin)
            }
        }
    }

    async fn get_admin(&self, id: AdminId) -> StoreResult<Option<Admin>> {
        Ok(self.admins.get(&id).map(|row| row.value().clone()))
    }

    async fn find_admin_by_email(&self, email: &str) -> StoreResult<Option<Admin>> {
        let Some(id) = self
            .admin_emails
            .get(&normalize_email(email))
            .map(|row| *row.value())
        else {
            return Ok(None);
        };
        self.get_admin(id).await
    }

    async fn list_admins(&self) -> StoreResult<Vec<Admin>> {
        Ok(snapshot(&self.admins))
    }

    async fn create_school(&self, input: NewSchool) -> StoreResult<School> {
        let school = input.into_school(SchoolId::new(), self.clock.now());
        match self.school_emails.entry(school.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateEmail(school.email)),
            Entry::Vacant(slot) => {
                self.schools.insert(school.id, school.clone());
                slot.insert(school.id);
                debug!(school_id = %school.id, "School created");
                Ok(school)
            }
        }
    }

    async fn get_school(&self, id: SchoolId) -> StoreResult<Option<School>> {
        Ok(self.schools.get(&id).map(|row| row.value().clone()))
    }

    async fn find_school_by_email(&self, email: &str) -> StoreResult<Option<School>> {
        let Some(id) = self
            .school_emails
            .get(&normalize_email(email))
            .map(|row| *row.value())
        else {
            return Ok(None);
        };
        self.get_school(id).await
    }

    async fn list_schools(&self) -> StoreResult<Vec<School>> {
        Ok(snapshot(&self.schools))
    }

    async fn update_school(
        &self,
        id: SchoolId,
        patch: SchoolPatch,
    ) -> StoreResult<Option<School>> {
        Ok(patch_row(&self.schools, &id, |row| patch.apply_to(row)))
    }

    async fn modify_school(
        &self,
        id: SchoolId,
        transition: Transition<'_, School, SchoolPatch>,
    ) -> StoreResult<Option<School>> {
        transition_row(&self.schools, &id, transition, SchoolPatch::apply_to)
    }

    async fn create_subscription(&self, input: NewSubscription) -> StoreResult<Subscription> {
        let subscription = input.into_subscription(SubscriptionId::new(), self.clock.now());
        self.subscriptions
            .insert(subscription.id, subscription.clone());
        debug!(subscription_id = %subscription.id, "Subscription created");
        Ok(subscription)
    }

    async fn get_subscription(&self, id: SubscriptionId) -> StoreResult<Option<Subscription>> {
        Ok(self.subscriptions.get(&id).map(|row| row.value().clone()))
    }

    async fn list_subscriptions(&self) -> StoreResult<Vec<Subscription>> {
        Ok(snapshot(&self.subscriptions))
    }

    async fn subscriptions_for_school(
        &self,
        school_id: SchoolId,
    ) -> StoreResult<Vec<Subscription>> {
        Ok(select(&self.subscriptions, |s| s.school_id == school_id))
    }

    async fn update_subscription(
        &self,
        id: SubscriptionId,
        patch: SubscriptionPatch,
    ) -> StoreResult<Option<Subscription>> {
        Ok(patch_row(&self.subscriptions, &id, |row| patch.apply_to(row)))
    }

    async fn modify_subscription(
        &self,
        id: SubscriptionId,
        transition: Transition<'_, Subscription, SubscriptionPatch>,
    ) -> StoreResult<Option<Subscription>> {
        transition_row(
            &self.subscriptions,
            &id,
            transition,
            SubscriptionPatch::apply_to,
        )
    }

    async fn create_payment(&self, input: NewPayment) -> StoreResult<Payment> {
        let payment = input.into_payment(PaymentId::new(), self.clock.now());
        self.payments.insert(payment.id, payment.clone());
        debug!(payment_id = %payment.id, "Payment created");
        Ok(payment)
    }

    async fn get_payment(&self, id: PaymentId) -> StoreResult<Option<Payment>> {
        Ok(self.payments.get(&id).map(|row| row.value().clone()))
    }

    async fn list_payments(&self) -> StoreResult<Vec<Payment>> {
        Ok(snapshot(&self.payments))
    }

    async fn payments_for_school(&self, school_id: SchoolId) -> StoreResult<Vec<Payment>> {
        Ok(select(&self.payments, |p| p.school_id == school_id))
    }

    async fn update_payment(
        &self,
        id: PaymentId,
        patch: PaymentPatch,
    ) -> StoreResult<Option<Payment>> {
        Ok(patch_row(&self.payments, &id, |row| patch.apply_to(row)))
    }

    async fn modify_payment(
        &self,
        id: PaymentId,
        transition: Transition<'_, Payment, PaymentPatch>,
    ) -> StoreResult<Option<Payment>> {
        transition_row(&self.payments, &id, transition, PaymentPatch::apply_to)
    }

    async fn create_document(&self, input: NewDocument) -> StoreResult<Document> {
        let document = input.into_document(DocumentId::new(), self.clock.now());
        self.documents.insert(document.id, document.clone());
        debug!(document_id = %document.id, "Document created");
        Ok(document)
    }

    async fn get_document(&self, id: DocumentId) -> StoreResult<Option<Document>> {
        Ok(self.documents.get(&id).map(|row| row.value().clone()))
    }

    async fn list_documents(&self) -> StoreResult<Vec<Document>> {
        Ok(snapshot(&self.documents))
    }

    async fn documents_for_school(&self, school_id: SchoolId) -> StoreResult<Vec<Document>> {
        Ok(select(&self.documents, |d| d.school_id == school_id))
    }

    async fn append_audit_log(&self, input: NewAuditLog) -> StoreResult<AuditLog> {
        let entry = input.into_audit_log(AuditLogId::new(), self.clock.now());
        self.audit_logs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry.clone());
        Ok(entry)
    }

    async fn list_audit_logs(&self) -> StoreResult<Vec<AuditLog>> {
        let mut entries: Vec<AuditLog> = self
            .audit_logs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .cloned()
            .collect();
        // Stable: equal timestamps keep newest-inserted first.
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartgen_core::school::SchoolStatus;

    #[tokio::test]
    async fn test_missing_keys_are_none() {
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
                .modify_school(SchoolId::new(), &|_| Ok(SchoolPatch {
                    status: Some(SchoolStatus::Approved),
                }))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_rejected_transition_leaves_row_untouched() {
        let store = MemoryStore::new();
        let school = store
            .create_school(NewSchool {
                email: "a@example.com".to_string(),
                ..NewSchool::default()
            })
            .await
            .unwrap();

        let err = store
            .modify_school(school.id, &|_| Err(LifecycleError::DocumentTypeRequired))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::Rejected(LifecycleError::DocumentTypeRequired));
        assert_eq!(store.get_school(school.id).await.unwrap(), Some(school));
    }
}
