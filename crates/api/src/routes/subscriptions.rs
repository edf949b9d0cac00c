//! Subscription creation and admin lifecycle actions.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
};
use serde::Deserialize;
use smartgen_core::audit::{AuditAction, EntityType, NewAuditLog};
use smartgen_core::lifecycle::LifecycleError;
use smartgen_core::subscription::{Subscription, SubscriptionService, TRIAL_MONTHS};
use smartgen_shared::types::{SchoolId, SubscriptionId};
use tracing::info;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{ApiJson, ApiPath, RecordId};
use crate::middleware::AuthAdmin;

/// Creates the public subscription routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/subscriptions/create", post(create_subscription))
}

/// Creates the admin subscription routes.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/subscriptions", get(list_subscriptions))
        .route("/admin/subscriptions/{id}/approve", patch(approve_subscription))
        .route("/admin/subscriptions/{id}/grant-trial", patch(grant_trial))
        .route("/admin/subscriptions/{id}/revoke", patch(revoke_subscription))
}

/// Subscription request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionRequest {
    /// Subscribing school.
    pub school_id: RecordId<SchoolId>,
    /// Product id from the pricing table.
    pub product_type: String,
    /// Students covered.
    pub student_count: i64,
    /// Contract length, one year if absent.
    #[serde(default)]
    pub contract_years: Option<i64>,
}

/// Trial grant body.
#[derive(Debug, Deserialize)]
pub struct GrantTrialRequest {
    /// Trial length in months.
    #[serde(default)]
    pub months: Option<i64>,
}

const SUBSCRIPTION_NOT_FOUND: &str = "Subscription not found";

/// POST /subscriptions/create - Price and open a pending subscription.
async fn create_subscription(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateSubscriptionRequest>,
) -> ApiResult<(StatusCode, Json<Subscription>)> {
    let school_id = payload.school_id.or_not_found("School not found")?;
    let school = state
        .store
        .get_school(school_id)
        .await?
        .ok_or_else(|| ApiError::not_found("School not found"))?;

    let quote = SubscriptionService::quote(
        &payload.product_type,
        payload.student_count,
        payload.contract_years,
    )?;
    let product_name = quote.product.name;

    let subscription = state
        .store
        .create_subscription(quote.into_new_subscription(school.id))
        .await?;

    state
        .audit(
            NewAuditLog::new(
                AuditAction::SubscriptionCreated,
                EntityType::Subscription,
                subscription.id,
            )
            .details(format!(
                "Subscription for {product_name} created for school {}",
                school.name
            )),
        )
        .await;

    info!(
        subscription_id = %subscription.id,
        school_id = %school.id,
        product = %subscription.product_type,
        total_amount = subscription.total_amount,
        "Subscription created"
    );
    Ok((StatusCode::CREATED, Json(subscription)))
}

/// GET /admin/subscriptions - All subscriptions.
async fn list_subscriptions(State(state): State<AppState>) -> ApiResult<Json<Vec<Subscription>>> {
    Ok(Json(state.store.list_subscriptions().await?))
}

/// PATCH /admin/subscriptions/{id}/approve - Activate for the full contract.
async fn approve_subscription(
    State(state): State<AppState>,
    auth: AuthAdmin,
    ApiPath(id): ApiPath<RecordId<SubscriptionId>>,
) -> ApiResult<Json<Subscription>> {
    let id = id.or_not_found(SUBSCRIPTION_NOT_FOUND)?;
    let now = state.clock.now();
    let subscription = state
        .store
        .modify_subscription(id, &|current| SubscriptionService::approve(current, now))
        .await?
        .ok_or_else(|| ApiError::not_found(SUBSCRIPTION_NOT_FOUND))?;

    state
        .audit(
            NewAuditLog::new(
                AuditAction::SubscriptionApproved,
                EntityType::Subscription,
                subscription.id,
            )
            .by(auth.admin_id)
            .details(format!(
                "Subscription approved for {} year(s)",
                subscription.contract_years
            )),
        )
        .await;

    info!(subscription_id = %subscription.id, admin_id = %auth.admin_id, "Subscription approved");
    Ok(Json(subscription))
}

/// PATCH /admin/subscriptions/{id}/grant-trial - Start a 1-3 month trial.
async fn grant_trial(
    State(state): State<AppState>,
    auth: AuthAdmin,
    ApiPath(id): ApiPath<RecordId<SubscriptionId>>,
    ApiJson(payload): ApiJson<GrantTrialRequest>,
) -> ApiResult<Json<Subscription>> {
    // Range is checked before the lookup
    let months = payload
        .months
        .filter(|m| TRIAL_MONTHS.contains(m))
        .ok_or_else(|| {
            LifecycleError::InvalidTrialLength(payload.months.unwrap_or_default())
        })?;
    let id = id.or_not_found(SUBSCRIPTION_NOT_FOUND)?;

    let now = state.clock.now();
    let subscription = state
        .store
        .modify_subscription(id, &|current| {
            SubscriptionService::grant_trial(current, months, now)
        })
        .await?
        .ok_or_else(|| ApiError::not_found(SUBSCRIPTION_NOT_FOUND))?;

    state
        .audit(
            NewAuditLog::new(
                AuditAction::TrialGranted,
                EntityType::Subscription,
                subscription.id,
            )
            .by(auth.admin_id)
            .details(format!("Trial granted for {months} month(s)")),
        )
        .await;

    info!(subscription_id = %subscription.id, admin_id = %auth.admin_id, months, "Trial granted");
    Ok(Json(subscription))
}

/// PATCH /admin/subscriptions/{id}/revoke - Withdraw access.
async fn revoke_subscription(
    State(state): State<AppState>,
    auth: AuthAdmin,
    ApiPath(id): ApiPath<RecordId<SubscriptionId>>,
) -> ApiResult<Json<Subscription>> {
    let id = id.or_not_found(SUBSCRIPTION_NOT_FOUND)?;
    let subscription = state
        .store
        .modify_subscription(id, &|current| Ok(SubscriptionService::revoke(current)))
        .await?
        .ok_or_else(|| ApiError::not_found(SUBSCRIPTION_NOT_FOUND))?;

    state
        .audit(
            NewAuditLog::new(
                AuditAction::SubscriptionRevoked,
                EntityType::Subscription,
                subscription.id,
            )
            .by(auth.admin_id),
        )
        .await;

    info!(subscription_id = %subscription.id, admin_id = %auth.admin_id, "Subscription revoked");
    Ok(Json(subscription))
}
