//! Payment orders and gateway callback verification.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use smartgen_core::audit::{AuditAction, EntityType, NewAuditLog};
use smartgen_core::payment::{
    NewPayment, Payment, PaymentPatch, PaymentService, generate_order_id,
};
use smartgen_core::store::StoreError;
use smartgen_core::subscription::{SubscriptionService, SubscriptionStatus};
use smartgen_shared::types::{PaymentId, SubscriptionId};
use tracing::{debug, info, warn};

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{ApiJson, RecordId};

/// Creates the public payment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments/create-order", post(create_order))
        .route("/payments/verify", post(verify_payment))
}

/// Creates the admin payment routes.
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/admin/payments", get(list_payments))
}

/// Order request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Subscription to pay for.
    pub subscription_id: RecordId<SubscriptionId>,
}

/// Gateway callback body. The gateway's own `razorpay*` names are accepted.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentRequest {
    /// Local payment id returned by create-order.
    pub payment_id: RecordId<PaymentId>,
    /// Gateway payment id.
    #[serde(default, alias = "razorpayPaymentId")]
    pub gateway_payment_id: String,
    /// Gateway order id echoed by the checkout client.
    #[serde(default, alias = "razorpayOrderId")]
    pub gateway_order_id: Option<String>,
    /// Hex HMAC-SHA256 signature.
    #[serde(default, alias = "razorpaySignature")]
    pub gateway_signature: String,
    /// Payment method reported by the gateway.
    #[serde(default)]
    pub payment_method: Option<String>,
}

/// POST /payments/create-order - Open a pending payment for a subscription.
async fn create_order(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateOrderRequest>,
) -> ApiResult<Json<Value>> {
    let subscription_id = payload.subscription_id.or_not_found("Subscription not found")?;
    let subscription = state
        .store
        .get_subscription(subscription_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Subscription not found"))?;

    let order_id = generate_order_id(state.clock.now());
    let payment = state
        .store
        .create_payment(NewPayment::for_subscription(&subscription, order_id)?)
        .await?;

    state
        .audit(
            NewAuditLog::new(AuditAction::PaymentOrderCreated, EntityType::Payment, payment.id)
                .details(format!(
                    "Order {} created for subscription {}",
                    payment.razorpay_order_id, subscription.id
                )),
        )
        .await;

    info!(
        payment_id = %payment.id,
        subscription_id = %subscription.id,
        amount = payment.amount,
        "Payment order created"
    );
    Ok(Json(json!({
        "orderId": payment.razorpay_order_id,
        "amount": payment.amount,
        "currency": payment.currency,
        "key": &*state.gateway_key_id,
        "paymentId": payment.id,
    })))
}

/// POST /payments/verify - Settle a payment from the gateway callback.
async fn verify_payment(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<VerifyPaymentRequest>,
) -> ApiResult<Json<Value>> {
    let payment_id = payload.payment_id.or_not_found("Payment not found")?;
    let payment = state
        .store
        .get_payment(payment_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Payment not found"))?;

    let checked = PaymentService::check_signature(
        &state.verifier,
        &payment,
        payload.gateway_order_id.as_deref(),
        &payload.gateway_payment_id,
        &payload.gateway_signature,
    );

    if let Err(e) = checked {
        warn!(payment_id = %payment.id, error = %e, "Payment signature rejected");
        fail_payment(&state, payment.id).await?;
        return Err(e.into());
    }

    let now = state.clock.now();
    let completed = state
        .store
        .modify_payment(payment.id, &|current| {
            PaymentService::complete(
                current,
                &payload.gateway_payment_id,
                &payload.gateway_signature,
                now,
            )
            .map(|patch| PaymentPatch {
                payment_method: payload.payment_method.clone(),
                ..patch
            })
        })
        .await?
        .ok_or_else(|| ApiError::not_found("Payment not found"))?;

    mark_subscription_paid(&state, &completed).await?;

    state
        .audit(
            NewAuditLog::new(AuditAction::PaymentCompleted, EntityType::Payment, completed.id)
                .details(format!(
                    "Payment of ₹{} completed",
                    completed.money().to_major_decimal()
                )),
        )
        .await;

    info!(payment_id = %completed.id, subscription_id = %completed.subscription_id, "Payment verified");
    Ok(Json(json!({
        "success": true,
        "message": "Payment verified successfully",
    })))
}

/// Marks a pending payment failed. Already settled payments are left alone.
async fn fail_payment(state: &AppState, id: PaymentId) -> ApiResult<()> {
    match state.store.modify_payment(id, &|current| PaymentService::fail(current)).await {
        Ok(Some(failed)) => {
            state
                .audit(
                    NewAuditLog::new(AuditAction::PaymentFailed, EntityType::Payment, failed.id)
                        .details("Payment signature verification failed"),
                )
                .await;
            Ok(())
        }
        Ok(None) => Err(ApiError::not_found("Payment not found")),
        Err(StoreError::Rejected(e)) => {
            debug!(payment_id = %id, error = %e, "Payment already settled");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn mark_subscription_paid(state: &AppState, payment: &Payment) -> ApiResult<()> {
    let updated = state
        .store
        .modify_subscription(payment.subscription_id, &|current| {
            Ok(SubscriptionService::mark_paid(current))
        })
        .await?;

    match updated {
        Some(subscription) if subscription.status != SubscriptionStatus::Paid => {
            warn!(
                subscription_id = %subscription.id,
                status = %subscription.status,
                "Subscription not moved to paid"
            );
        }
        Some(_) => {}
        None => {
            warn!(subscription_id = %payment.subscription_id, "Paid subscription no longer exists");
        }
    }
    Ok(())
}

/// GET /admin/payments - All payments.
async fn list_payments(State(state): State<AppState>) -> ApiResult<Json<Vec<Payment>>> {
    Ok(Json(state.store.list_payments().await?))
}
