//! Admin decisions on school registrations.

use crate::school::types::{SchoolPatch, SchoolStatus};

/// Stateless service for school review transitions.
///
/// A decision is not final: an admin may approve or reject again at any
/// time, including reversing an earlier decision. Nothing moves a school
/// back to pending.
pub struct SchoolService;

impl SchoolService {
    /// Approve a school.
    #[must_use]
    pub fn approve() -> SchoolPatch {
        Self::decide(SchoolStatus::Approved)
    }

    /// Reject a school.
    #[must_use]
    pub fn reject() -> SchoolPatch {
        Self::decide(SchoolStatus::Rejected)
    }

    fn decide(target: SchoolStatus) -> SchoolPatch {
        SchoolPatch {
            status: Some(target),
        }
    }

    /// Check if a school status transition is allowed.
    #[must_use]
    pub fn is_valid_transition(_from: SchoolStatus, to: SchoolStatus) -> bool {
        matches!(to, SchoolStatus::Approved | SchoolStatus::Rejected)
    }
}
