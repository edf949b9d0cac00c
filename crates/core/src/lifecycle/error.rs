//! Lifecycle error types for subscriptions and payments.

use smartgen_shared::AppError;
use thiserror::Error;

use crate::payment::PaymentStatus;
use crate::subscription::SubscriptionStatus;

/// Errors raised while validating input or moving an entity between states.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// Product id is not in the pricing table.
    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    /// Product exists but is not yet sold.
    #[error("Product {0} is not available yet")]
    ProductUnavailable(String),

    /// Student count must be at least one.
    #[error("Student count must be at least 1, got {0}")]
    InvalidStudentCount(i64),

    /// Contract term must be at least one year.
    #[error("Contract years must be at least 1, got {0}")]
    InvalidContractYears(i64),

    /// Computed amount does not fit the amount type.
    #[error("Subscription amount is too large")]
    AmountOverflow,

    /// Trial length outside the allowed range.
    #[error("Trial period must be 1-3 months, got {0}")]
    InvalidTrialLength(i64),

    /// Resulting date is outside the representable range.
    #[error("Resulting date is out of range")]
    DateOverflow,

    /// Document type was empty.
    #[error("Document type is required")]
    DocumentTypeRequired,

    /// Subscription transition not in the lifecycle graph.
    #[error("Invalid subscription transition from {from} to {to}")]
    InvalidSubscriptionTransition {
        /// The current status.
        from: SubscriptionStatus,
        /// The attempted target status.
        to: SubscriptionStatus,
    },

    /// Payment was already settled.
    #[error("Invalid payment transition from {from} to {to}")]
    InvalidPaymentTransition {
        /// The current status.
        from: PaymentStatus,
        /// The attempted target status.
        to: PaymentStatus,
    },
}

impl LifecycleError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidSubscriptionTransition { .. }
            | Self::InvalidPaymentTransition { .. } => 409,
            _ => 400,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownProduct(_) => "UNKNOWN_PRODUCT",
            Self::ProductUnavailable(_) => "PRODUCT_UNAVAILABLE",
            Self::InvalidStudentCount(_) => "INVALID_STUDENT_COUNT",
            Self::InvalidContractYears(_) => "INVALID_CONTRACT_YEARS",
            Self::AmountOverflow => "AMOUNT_OVERFLOW",
            Self::InvalidTrialLength(_) => "INVALID_TRIAL_LENGTH",
            Self::DateOverflow => "DATE_OVERFLOW",
            Self::DocumentTypeRequired => "DOCUMENT_TYPE_REQUIRED",
            Self::InvalidSubscriptionTransition { .. }
            | Self::InvalidPaymentTransition { .. } => "INVALID_TRANSITION",
        }
    }
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        if err.status_code() == 409 {
            Self::Conflict(err.to_string())
        } else {
            Self::Validation(err.to_string())
        }
    }
}
