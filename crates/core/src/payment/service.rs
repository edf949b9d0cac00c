//! Payment settlement.

use chrono::{DateTime, Utc};

use crate::lifecycle::LifecycleError;
use crate::payment::signature::{SignatureError, SignatureVerifier};
use crate::payment::types::{Payment, PaymentPatch, PaymentStatus};

/// Stateless service for payment settlement.
pub struct PaymentService;

impl PaymentService {
    /// Checks a gateway callback against the stored order.
    ///
    /// The signature is always computed over the stored order id; a client
    /// echoing a different order id is treated as a mismatch.
    pub fn check_signature(
        verifier: &SignatureVerifier,
        payment: &Payment,
        gateway_order_id: Option<&str>,
        gateway_payment_id: &str,
        signature: &str,
    ) -> Result<(), SignatureError> {
        if gateway_order_id.is_some_and(|id| id != payment.razorpay_order_id) && !verifier.is_bypass()
        {
            return Err(SignatureError::Mismatch);
        }
        verifier.verify(&payment.razorpay_order_id, gateway_payment_id, signature)
    }

    /// Settles a pending payment as completed.
    pub fn complete(
        current: &Payment,
        gateway_payment_id: &str,
        signature: &str,
        now: DateTime<Utc>,
    ) -> Result<PaymentPatch, LifecycleError> {
        Self::guard(current.status, PaymentStatus::Completed)?;
        Ok(PaymentPatch {
            status: Some(PaymentStatus::Completed),
            razorpay_payment_id: Some(gateway_payment_id.to_string()),
            razorpay_signature: Some(signature.to_string()),
            paid_at: Some(now),
            ..PaymentPatch::default()
        })
    }

    /// Settles a pending payment as failed.
    pub fn fail(current: &Payment) -> Result<PaymentPatch, LifecycleError> {
        Self::guard(current.status, PaymentStatus::Failed)?;
        Ok(PaymentPatch {
            status: Some(PaymentStatus::Failed),
            ..PaymentPatch::default()
        })
    }

    fn guard(from: PaymentStatus, to: PaymentStatus) -> Result<(), LifecycleError> {
        if Self::is_valid_transition(from, to) {
            Ok(())
        } else {
            Err(LifecycleError::InvalidPaymentTransition { from, to })
        }
    }

    /// Payments settle once, from pending.
    #[must_use]
    pub fn is_valid_transition(from: PaymentStatus, to: PaymentStatus) -> bool {
        matches!(
            (from, to),
            (
                PaymentStatus::Pending,
                PaymentStatus::Completed | PaymentStatus::Failed
            )
        )
    }
}
