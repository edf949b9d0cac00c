//! SmartGen API Server
//!
//! Main entry point for the SmartGen registration and subscription backend.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use smartgen_api::{AppState, create_router};
use smartgen_core::auth::hash_password;
use smartgen_core::clock::{Clock, SystemClock};
use smartgen_core::store::Store;
use smartgen_db::{MemoryStore, seed_admin};
use smartgen_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smartgen=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store: Arc<dyn Store> = Arc::new(MemoryStore::with_clock(Arc::clone(&clock)));

    // Seed the configured admin
    let password_hash = hash_password(&config.admin.password)?;
    seed_admin(
        store.as_ref(),
        &config.admin.email,
        &config.admin.name,
        password_hash,
    )
    .await?;

    let state = AppState::from_config(&config, store, clock)?;
    if state.shared_password_hash.is_some() {
        warn!("Shared admin password is enabled");
    }
    if state.verifier.is_bypass() {
        warn!("Payment signature checks are disabled (gateway.strict = false, no secret)");
    }

    spawn_sweeper(&state, config.rate_limit.window_secs);

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

/// Evicts expired sessions and finished rate-limit windows.
fn spawn_sweeper(state: &AppState, every_secs: u64) {
    let sessions = Arc::clone(&state.sessions);
    let limiter = Arc::clone(&state.rate_limiter);

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(every_secs.max(1)));
        loop {
            interval.tick().await;
            let sessions_purged = sessions.purge_expired();
            let windows_purged = limiter.purge_expired();
            debug!(sessions_purged, windows_purged, "Swept expired state");
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
