use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smartgen_shared::types::{AdminId, AuditLogId};
use std::fmt;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Admin signed in.
    AdminLogin,
    /// Admin signed out.
    AdminLogout,
    /// School submitted a registration.
    SchoolRegistered,
    /// Admin approved a school.
    SchoolApproved,
    /// Admin rejected a school.
    SchoolRejected,
    /// School created a subscription.
    SubscriptionCreated,
    /// Admin activated a subscription.
    SubscriptionApproved,
    /// Admin granted a trial.
    TrialGranted,
    /// Admin revoked a subscription.
    SubscriptionRevoked,
    /// Payment order opened.
    PaymentOrderCreated,
    /// Payment signature verified.
    PaymentCompleted,
    /// Payment signature rejected.
    PaymentFailed,
    /// Admin generated a document.
    DocumentGenerated,
}

impl AuditAction {
    /// Returns the wire name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AdminLogin => "admin_login",
            Self::AdminLogout => "admin_logout",
            Self::SchoolRegistered => "school_registered",
            Self::SchoolApproved => "school_approved",
            Self::SchoolRejected => "school_rejected",
            Self::SubscriptionCreated => "subscription_created",
            Self::SubscriptionApproved => "subscription_approved",
            Self::TrialGranted => "trial_granted",
            Self::SubscriptionRevoked => "subscription_revoked",
            Self::PaymentOrderCreated => "payment_order_created",
            Self::PaymentCompleted => "payment_completed",
            Self::PaymentFailed => "payment_failed",
            Self::DocumentGenerated => "document_generated",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of entity an audit entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    /// An admin account.
    Admin,
    /// A school.
    School,
    /// A subscription.
    Subscription,
    /// A payment.
    Payment,
    /// A generated document.
    Document,
}

/// One audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    /// Identifier.
    pub id: AuditLogId,
    /// Action taken.
    pub action: AuditAction,
    /// Kind of the affected entity.
    pub entity_type: EntityType,
    /// Id of the affected entity.
    pub entity_id: String,
    /// Acting admin, `None` for unauthenticated actions.
    pub performed_by: Option<AdminId>,
    /// Free-text detail.
    pub details: Option<String>,
    /// When the action happened.
    pub created_at: DateTime<Utc>,
}

/// Input for appending an audit entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditLog {
    /// Action taken.
    pub action: AuditAction,
    /// Kind of the affected entity.
    pub entity_type: EntityType,
    /// Id of the affected entity.
    pub entity_id: String,
    /// Acting admin.
    pub performed_by: Option<AdminId>,
    /// Free-text detail.
    pub details: Option<String>,
}

impl NewAuditLog {
    /// Starts an entry for `entity_id`.
    pub fn new(action: AuditAction, entity_type: EntityType, entity_id: impl fmt::Display) -> Self {
        Self {
            action,
            entity_type,
            entity_id: entity_id.to_string(),
            performed_by: None,
            details: None,
        }
    }

    /// Records the acting admin.
    #[must_use]
    pub fn by(mut self, admin_id: AdminId) -> Self {
        self.performed_by = Some(admin_id);
        self
    }

    /// Attaches free-text detail.
    #[must_use]
    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Builds the stored entry.
    #[must_use]
    pub fn into_audit_log(self, id: AuditLogId, created_at: DateTime<Utc>) -> AuditLog {
        AuditLog {
            id,
            action: self.action,
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            performed_by: self.performed_by,
            details: self.details,
            created_at,
        }
    }
}
