//! Admin login, logout, and session check.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use smartgen_core::audit::{AuditAction, EntityType, NewAuditLog};
use smartgen_core::auth::{AdminSummary, check_admin_password};
use tracing::{info, warn};

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extractors::ApiJson;
use crate::middleware::AuthAdmin;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Creates the login route.
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/admin/login", post(login))
}

/// Creates the session-protected admin auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/logout", post(logout))
        .route("/admin/verify", get(verify))
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Admin email.
    #[serde(default)]
    pub email: String,
    /// Plaintext password.
    #[serde(default)]
    pub password: String,
}

/// POST /admin/login - Exchange credentials for a bearer token.
async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<Json<Value>> {
    let email = payload.email.trim();
    if email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::validation("Email and password required"));
    }

    let Some(admin) = state.store.find_admin_by_email(email).await? else {
        warn!(email = %email, "Login attempt for unknown admin");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    let valid = check_admin_password(
        &payload.password,
        &admin.password_hash,
        state.shared_password_hash.as_deref(),
    )?;
    if !valid {
        warn!(admin_id = %admin.id, "Failed login attempt - invalid password");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let session = state.sessions.issue(admin.id);
    state
        .audit(
            NewAuditLog::new(AuditAction::AdminLogin, EntityType::Admin, admin.id)
                .by(admin.id)
                .details(format!("Admin {} logged in", admin.email)),
        )
        .await;

    info!(admin_id = %admin.id, expires_at = %session.expires_at, "Admin logged in");
    Ok(Json(json!({
        "token": session.token,
        "admin": AdminSummary::from(&admin),
    })))
}

/// POST /admin/logout - Revoke the current token.
async fn logout(State(state): State<AppState>, auth: AuthAdmin) -> Json<Value> {
    state.sessions.revoke(&auth.token);
    state
        .audit(
            NewAuditLog::new(AuditAction::AdminLogout, EntityType::Admin, auth.admin_id)
                .by(auth.admin_id),
        )
        .await;

    info!(admin_id = %auth.admin_id, "Admin logged out");
    Json(json!({ "success": true }))
}

/// GET /admin/verify - Resolve the token to its admin.
async fn verify(State(state): State<AppState>, auth: AuthAdmin) -> ApiResult<Json<Value>> {
    let Some(admin) = state.store.get_admin(auth.admin_id).await? else {
        state.sessions.revoke(&auth.token);
        return Err(ApiError::unauthorized("Invalid session"));
    };
    Ok(Json(json!({ "admin": AdminSummary::from(&admin) })))
}
