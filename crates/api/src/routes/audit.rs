//! Audit log listing.

use axum::{Json, Router, extract::State, routing::get};
use smartgen_core::audit::AuditLog;
use smartgen_shared::types::ListLimit;

use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::ApiQuery;

/// Creates the audit routes.
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/admin/audit-logs", get(list_audit_logs))
}

/// GET /admin/audit-logs?limit=N - Newest first, optionally capped.
async fn list_audit_logs(
    State(state): State<AppState>,
    ApiQuery(limit): ApiQuery<ListLimit>,
) -> ApiResult<Json<Vec<AuditLog>>> {
    let entries = state.store.list_audit_logs().await?;
    Ok(Json(limit.apply(entries)))
}
