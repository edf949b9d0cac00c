//! Append-only audit trail of state-changing actions.

mod types;

pub use types::{AuditAction, AuditLog, EntityType, NewAuditLog};
