//! Document generation.

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::document::types::NewDocument;
use crate::lifecycle::{LifecycleError, add_years};
use crate::school::School;
use crate::subscription::Subscription;

/// Stateless document generator.
pub struct DocumentService;

impl DocumentService {
    /// Validity of every generated document, in years.
    pub const VALIDITY_YEARS: u32 = 1;

    /// Builds a document snapshot for `school` and an optional subscription.
    pub fn generate(
        document_type: &str,
        school: &School,
        subscription: Option<&Subscription>,
        now: DateTime<Utc>,
    ) -> Result<NewDocument, LifecycleError> {
        let document_type = document_type.trim();
        if document_type.is_empty() {
            return Err(LifecycleError::DocumentTypeRequired);
        }

        let valid_until =
            add_years(now, Self::VALIDITY_YEARS).ok_or(LifecycleError::DateOverflow)?;
        let data = json!({
            "school": school,
            "subscription": subscription,
            "validFrom": now,
            "validUntil": valid_until,
        });

        Ok(NewDocument {
            school_id: school.id,
            subscription_id: subscription.map(|s| s.id),
            document_type: document_type.to_string(),
            document_number: format!(
                "{}-{}",
                document_type.to_uppercase(),
                now.timestamp_millis()
            ),
            valid_from: now,
            valid_until,
            data: data.to_string(),
        })
    }
}
