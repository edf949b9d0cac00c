//! School domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smartgen_shared::types::SchoolId;
use std::fmt;

/// Admin decision on a school registration.
///
/// - Pending → Approved (approve)
/// - Pending → Rejected (reject)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchoolStatus {
    /// Awaiting review.
    Pending,
    /// Accepted by an admin.
    Approved,
    /// Turned down by an admin.
    Rejected,
}

impl SchoolStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Returns true once an admin has decided.
    #[must_use]
    pub fn is_decided(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for SchoolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct School {
    /// Identifier.
    pub id: SchoolId,
    /// School name.
    pub name: String,
    /// Contact email, unique across schools (stored lowercase).
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Street address.
    pub address: String,
    /// City.
    pub city: String,
    /// State.
    pub state: String,
    /// Postal code.
    pub pincode: String,
    /// Principal's name.
    pub principal_name: String,
    /// GST registration number.
    pub gst_number: Option<String>,
    /// TIN.
    pub tin_number: Option<String>,
    /// PAN.
    pub pan_number: Option<String>,
    /// School registration number.
    pub registration_number: Option<String>,
    /// Enrolled students.
    pub student_count: u32,
    /// Review status.
    pub status: SchoolStatus,
    /// When the school registered.
    pub created_at: DateTime<Utc>,
}

/// Registration input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewSchool {
    /// School name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Street address.
    pub address: String,
    /// City.
    pub city: String,
    /// State.
    pub state: String,
    /// Postal code.
    pub pincode: String,
    /// Principal's name.
    pub principal_name: String,
    /// GST registration number.
    pub gst_number: Option<String>,
    /// TIN.
    pub tin_number: Option<String>,
    /// PAN.
    pub pan_number: Option<String>,
    /// School registration number.
    pub registration_number: Option<String>,
    /// Enrolled students.
    pub student_count: u32,
}

impl NewSchool {
    /// Builds the stored record. New schools always start pending.
    #[must_use]
    pub fn into_school(self, id: SchoolId, created_at: DateTime<Utc>) -> School {
        School {
            id,
            email: normalize_email(&self.email),
            name: self.name,
            phone: self.phone,
            address: self.address,
            city: self.city,
            state: self.state,
            pincode: self.pincode,
            principal_name: self.principal_name,
            gst_number: self.gst_number,
            tin_number: self.tin_number,
            pan_number: self.pan_number,
            registration_number: self.registration_number,
            student_count: self.student_count,
            status: SchoolStatus::Pending,
            created_at,
        }
    }
}

/// Partial update of a school.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchoolPatch {
    /// New review status.
    pub status: Option<SchoolStatus>,
}

impl SchoolPatch {
    /// Returns `school` with the patch applied.
    #[must_use]
    pub fn apply_to(&self, school: &School) -> School {
        let mut next = school.clone();
        if let Some(status) = self.status {
            next.status = status;
        }
        next
    }
}

/// Canonical form used for uniqueness checks.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
