//! Server initialization and run loop

use anyhow::{Context, Result};
use axum::Extension;
use std::path::Path;
use std::sync::Arc;
use tokenmeter_core::{AccessGate, UsageStore};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::config::AppConfig;
use crate::api;

/// Initialize stores and serve the API until shutdown.
pub async fn run(config: AppConfig) -> Result<()> {
    let store = UsageStore::from_path(Path::new(&config.database.path))
        .await
        .context("Failed to open usage store")?;
    let store = Arc::new(store);

    let gate = Arc::new(AccessGate::new(config.auth.enabled));
    if !config.auth.enabled {
        warn!("authentication disabled; all callers are treated as anonymous admins");
    }

    let app = api::router()
        .layer(Extension(store))
        .layer(Extension(gate))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(addr = %addr, "Tokenmeter listening");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Tokenmeter shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
