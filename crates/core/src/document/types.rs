//! Document domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smartgen_shared::types::{DocumentId, SchoolId, SubscriptionId};

/// A generated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Identifier.
    pub id: DocumentId,
    /// School the document was issued to.
    pub school_id: SchoolId,
    /// Subscription the document covers, if any.
    pub subscription_id: Option<SubscriptionId>,
    /// Free-form document kind, e.g. "certificate".
    #[serde(rename = "type")]
    pub document_type: String,
    /// Human-readable number, `<TYPE>-<unix-millis>`.
    pub document_number: String,
    /// Start of validity.
    pub valid_from: DateTime<Utc>,
    /// End of validity.
    pub valid_until: DateTime<Utc>,
    /// Serialized JSON snapshot.
    pub data: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Input for storing a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    /// School the document was issued to.
    pub school_id: SchoolId,
    /// Subscription the document covers.
    pub subscription_id: Option<SubscriptionId>,
    /// Document kind.
    pub document_type: String,
    /// Document number.
    pub document_number: String,
    /// Start of validity.
    pub valid_from: DateTime<Utc>,
    /// End of validity.
    pub valid_until: DateTime<Utc>,
    /// Serialized JSON snapshot.
    pub data: String,
}

impl NewDocument {
    /// Builds the stored record.
    #[must_use]
    pub fn into_document(self, id: DocumentId, created_at: DateTime<Utc>) -> Document {
        Document {
            id,
            school_id: self.school_id,
            subscription_id: self.subscription_id,
            document_type: self.document_type,
            document_number: self.document_number,
            valid_from: self.valid_from,
            valid_until: self.valid_until,
            data: self.data,
            created_at,
        }
    }
}
