use chrono::{DateTime, Utc};
use serde::Serialize;
use smartgen_shared::types::AdminId;

/// An administrator account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    /// Identifier.
    pub id: AdminId,
    /// Login email, unique (stored lowercase).
    pub email: String,
    /// Argon2id PHC string.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Display name.
    pub name: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Input for creating an admin. The password must already be hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAdmin {
    /// Login email.
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Display name.
    pub name: String,
}

impl NewAdmin {
    /// Builds the stored record.
    #[must_use]
    pub fn into_admin(self, id: AdminId, created_at: DateTime<Utc>) -> Admin {
        Admin {
            id,
            email: crate::school::normalize_email(&self.email),
            password_hash: self.password_hash,
            name: self.name,
            created_at,
        }
    }
}

/// Public view of an admin returned by login and verify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminSummary {
    /// Identifier.
    pub id: AdminId,
    /// Login email.
    pub email: String,
    /// Display name.
    pub name: String,
}

impl From<&Admin> for AdminSummary {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            email: admin.email.clone(),
            name: admin.name.clone(),
        }
    }
}
