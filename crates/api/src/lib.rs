//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api`
//! - Bearer-session and rate-limit middleware
//! - Request extractors with JSON error bodies
//! - Mapping of domain errors to HTTP responses

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::http::header::AUTHORIZATION;
use chrono::Duration;
use smartgen_core::audit::NewAuditLog;
use smartgen_core::auth::{PasswordError, SessionRegistry, hash_password};
use smartgen_core::clock::Clock;
use smartgen_core::payment::SignatureVerifier;
use smartgen_core::rate_limit::FixedWindowLimiter;
use smartgen_core::store::Store;
use smartgen_shared::AppConfig;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

pub use error::ApiError;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// System of record.
    pub store: Arc<dyn Store>,
    /// Admin bearer sessions.
    pub sessions: Arc<SessionRegistry>,
    /// Per-client request limiter.
    pub rate_limiter: Arc<FixedWindowLimiter>,
    /// Payment signature verifier.
    pub verifier: Arc<SignatureVerifier>,
    /// Time source for every stamp the handlers make.
    pub clock: Arc<dyn Clock>,
    /// Public gateway key id handed to checkout clients.
    pub gateway_key_id: Arc<str>,
    /// Argon2 hash of the shared admin password, when one is configured.
    pub shared_password_hash: Option<Arc<str>>,
}

impl AppState {
    /// Builds the state from configuration.
    ///
    /// The shared admin password, if any, is hashed here so plaintext never
    /// outlives startup.
    pub fn from_config(
        config: &AppConfig,
        store: Arc<dyn Store>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, PasswordError> {
        let shared_password_hash = config
            .admin
            .shared_password
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(hash_password)
            .transpose()?
            .map(Arc::from);

        let ttl = Duration::seconds(i64::try_from(config.session.ttl_secs).unwrap_or(i64::MAX));
        let window =
            Duration::seconds(i64::try_from(config.rate_limit.window_secs).unwrap_or(i64::MAX));

        Ok(Self {
            store,
            sessions: Arc::new(SessionRegistry::new(Arc::clone(&clock), ttl)),
            rate_limiter: Arc::new(FixedWindowLimiter::new(
                Arc::clone(&clock),
                window,
                config.rate_limit.max_requests,
            )),
            verifier: Arc::new(SignatureVerifier::from_config(&config.gateway)),
            clock,
            gateway_key_id: Arc::from(config.gateway.key_id.as_str()),
            shared_password_hash,
        })
    }

    /// Appends an audit entry. Failures are logged, never surfaced.
    pub async fn audit(&self, entry: NewAuditLog) {
        let action = entry.action;
        if let Err(e) = self.store.append_audit_log(entry).await {
            error!(error = %e, action = %action, "Failed to write audit log");
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::api_routes_with_state(state.clone()))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit::rate_limit_middleware,
        ))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(SetSensitiveRequestHeadersLayer::new([AUTHORIZATION]))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
