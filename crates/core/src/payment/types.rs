//! Payment domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smartgen_shared::types::{Currency, Money, PaymentId, SchoolId, SubscriptionId};
use std::fmt;

use crate::lifecycle::LifecycleError;
use crate::subscription::Subscription;
use crate::token::random_hex;

/// Settlement status of a payment.
///
/// - Pending → Completed (signature verified)
/// - Pending → Failed (signature rejected)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Order opened, awaiting verification.
    Pending,
    /// Signature verified.
    Completed,
    /// Signature rejected.
    Failed,
}

impl PaymentStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Returns true once the payment has settled either way.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One gateway transaction backing a subscription.
///
/// The `razorpay*` wire names are kept for client compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Identifier.
    pub id: PaymentId,
    /// Paying school.
    pub school_id: SchoolId,
    /// Subscription being paid for.
    pub subscription_id: SubscriptionId,
    /// Order id issued when the order was opened.
    pub razorpay_order_id: String,
    /// Gateway payment id, set on completion.
    pub razorpay_payment_id: Option<String>,
    /// Gateway signature, set on completion.
    pub razorpay_signature: Option<String>,
    /// Amount in paise.
    pub amount: i64,
    /// Currency of `amount`.
    pub currency: Currency,
    /// Settlement status.
    pub status: PaymentStatus,
    /// Payment method reported by the gateway.
    pub payment_method: Option<String>,
    /// When the order was opened.
    pub created_at: DateTime<Utc>,
    /// When the payment completed.
    pub paid_at: Option<DateTime<Utc>>,
}

impl Payment {
    /// The amount as money.
    #[must_use]
    pub fn money(&self) -> Money {
        Money::from_minor(self.amount, self.currency)
    }
}

/// Input for opening a payment order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    /// Paying school.
    pub school_id: SchoolId,
    /// Subscription being paid for.
    pub subscription_id: SubscriptionId,
    /// Generated order id.
    pub razorpay_order_id: String,
    /// Amount in paise.
    pub amount: i64,
    /// Currency of `amount`.
    pub currency: Currency,
}

impl NewPayment {
    /// Prices an order for the full subscription total, converted to paise.
    pub fn for_subscription(
        subscription: &Subscription,
        order_id: String,
    ) -> Result<Self, LifecycleError> {
        let money = Money::from_major(subscription.total_amount, Currency::Inr)
            .ok_or(LifecycleError::AmountOverflow)?;

        Ok(Self {
            school_id: subscription.school_id,
            subscription_id: subscription.id,
            razorpay_order_id: order_id,
            amount: money.minor_units,
            currency: money.currency,
        })
    }

    /// Builds the stored record. New payments always start pending.
    #[must_use]
    pub fn into_payment(self, id: PaymentId, created_at: DateTime<Utc>) -> Payment {
        Payment {
            id,
            school_id: self.school_id,
            subscription_id: self.subscription_id,
            razorpay_order_id: self.razorpay_order_id,
            razorpay_payment_id: None,
            razorpay_signature: None,
            amount: self.amount,
            currency: self.currency,
            status: PaymentStatus::Pending,
            payment_method: None,
            created_at,
            paid_at: None,
        }
    }
}

/// Partial update of a payment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentPatch {
    /// New status.
    pub status: Option<PaymentStatus>,
    /// Gateway payment id.
    pub razorpay_payment_id: Option<String>,
    /// Gateway signature.
    pub razorpay_signature: Option<String>,
    /// Payment method.
    pub payment_method: Option<String>,
    /// Completion time.
    pub paid_at: Option<DateTime<Utc>>,
}

impl PaymentPatch {
    /// Returns `payment` with the patch applied.
    #[must_use]
    pub fn apply_to(&self, payment: &Payment) -> Payment {
        let mut next = payment.clone();
        if let Some(status) = self.status {
            next.status = status;
        }
        if let Some(id) = &self.razorpay_payment_id {
            next.razorpay_payment_id = Some(id.clone());
        }
        if let Some(signature) = &self.razorpay_signature {
            next.razorpay_signature = Some(signature.clone());
        }
        if let Some(method) = &self.payment_method {
            next.payment_method = Some(method.clone());
        }
        if let Some(at) = self.paid_at {
            next.paid_at = Some(at);
        }
        next
    }
}

/// Synthesizes a gateway order id: `order_<unix-millis>_<16 hex chars>`.
#[must_use]
pub fn generate_order_id(now: DateTime<Utc>) -> String {
    format!("order_{}_{}", now.timestamp_millis(), random_hex(8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscription::NewSubscription;

    fn subscription(total_amount: i64) -> Subscription {
        NewSubscription {
            school_id: SchoolId::new(),
            product_type: "school-safal".to_string(),
            price_per_student: 2,
            student_count: 50,
            total_amount,
            contract_years: 1,
        }
        .into_subscription(SubscriptionId::new(), Utc::now())
    }

    #[test]
    fn test_new_payment_converts_to_paise() {
        let sub = subscription(100);
        let new = NewPayment::for_subscription(&sub, "order_1_ab".to_string()).unwrap();
        assert_eq!(new.amount, 10_000);
        assert_eq!(new.currency, Currency::Inr);
        assert_eq!(new.subscription_id, sub.id);
        assert_eq!(new.school_id, sub.school_id);
    }

    #[test]
    fn test_new_payment_overflow() {
        let sub = subscription(i64::MAX / 10);
        assert_eq!(
            NewPayment::for_subscription(&sub, "order".to_string()),
            Err(LifecycleError::AmountOverflow)
        );
    }

    #[test]
    fn test_into_payment_is_pending() {
        let sub = subscription(100);
        let payment = NewPayment::for_subscription(&sub, "order_1_ab".to_string())
            .unwrap()
            .into_payment(PaymentId::new(), Utc::now());
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert!(payment.paid_at.is_none());
        assert_eq!(payment.money().to_major_decimal().to_string(), "100.00");
    }

    #[test]
    fn test_order_id_format() {
        let now = Utc::now();
        let id = generate_order_id(now);
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "order");
        assert_eq!(parts[1], now.timestamp_millis().to_string());
        assert_eq!(parts[2].len(), 16);
        assert!(parts[2].chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(generate_order_id(now), id);
    }

    #[test]
    fn test_payment_json_uses_gateway_names() {
        let sub = subscription(100);
        let payment = NewPayment::for_subscription(&sub, "order_1_ab".to_string())
            .unwrap()
            .into_payment(PaymentId::new(), Utc::now());
        let json = serde_json::to_value(&payment).unwrap();
        assert_eq!(json["razorpayOrderId"], "order_1_ab");
        assert_eq!(json["currency"], "INR");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["amount"], 10_000);
    }
}
