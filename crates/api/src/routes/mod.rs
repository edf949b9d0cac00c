//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod admin;
pub mod audit;
pub mod config;
pub mod dashboard;
pub mod documents;
pub mod health;
pub mod payments;
pub mod schools;
pub mod subscriptions;

/// Creates the routes that need no session.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(config::routes())
        .merge(admin::public_routes())
        .merge(schools::routes())
        .merge(subscriptions::routes())
        .merge(payments::routes())
}

/// Creates the admin routes without the session layer.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .merge(admin::routes())
        .merge(schools::admin_routes())
        .merge(subscriptions::admin_routes())
        .merge(payments::admin_routes())
        .merge(documents::admin_routes())
        .merge(audit::admin_routes())
        .merge(dashboard::admin_routes())
}

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Every /admin route except login requires a session
    let protected_routes = admin_routes().layer(middleware::from_fn_with_state(
        state.clone(),
        auth_middleware,
    ));

    Router::new().merge(public_routes()).merge(protected_routes)
}
