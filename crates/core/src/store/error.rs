//! Store error types.

use smartgen_shared::AppError;
use thiserror::Error;

use crate::lifecycle::LifecycleError;

/// Errors raised by a `Store` implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Another school already uses this email.
    #[error("A school with email {0} is already registered")]
    DuplicateEmail(String),

    /// Another admin already uses this email.
    #[error("An admin with email {0} already exists")]
    DuplicateAdmin(String),

    /// The modify closure refused the current record.
    #[error(transparent)]
    Rejected(#[from] LifecycleError),

    /// Backend failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail(_) | StoreError::DuplicateAdmin(_) => {
                Self::Validation(err.to_string())
            }
            StoreError::Rejected(inner) => inner.into(),
            StoreError::Backend(msg) => Self::Internal(msg),
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
