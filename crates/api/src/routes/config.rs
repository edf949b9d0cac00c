//! Static configuration for checkout clients.

use axum::{Json, Router, extract::State, routing::get};
use serde_json::{Value, json};
use smartgen_core::pricing::PricingTable;

use crate::AppState;

/// Creates the config routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pricing", get(pricing))
        .route("/config/payment-key", get(payment_key))
        .route("/config/razorpay-key", get(payment_key))
}

/// GET /pricing - Product catalogue keyed by product id.
async fn pricing() -> Json<PricingTable> {
    Json(PricingTable)
}

/// GET /config/payment-key - Public gateway key id.
async fn payment_key(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "key": &*state.gateway_key_id }))
}
