//! Dashboard routes.

use axum::{Json, Router, extract::State, routing::get};
use smartgen_core::dashboard::DashboardStats;

use crate::AppState;
use crate::error::ApiResult;

/// Creates the dashboard routes (requires auth middleware to be applied externally).
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/admin/dashboard-stats", get(dashboard_stats))
}

/// GET /admin/dashboard-stats - Record counts and completed revenue.
async fn dashboard_stats(State(state): State<AppState>) -> ApiResult<Json<DashboardStats>> {
    let (schools, subscriptions, payments) = tokio::try_join!(
        state.store.list_schools(),
        state.store.list_subscriptions(),
        state.store.list_payments(),
    )?;

    Ok(Json(DashboardStats::compute(
        &schools,
        &subscriptions,
        &payments,
    )))
}
