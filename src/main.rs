//! dashboard-bridge server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use dashboard_bridge::app_state::AppState;
use dashboard_bridge::backend::{BackendApi, HttpBackend};
use dashboard_bridge::config::BridgeConfig;
use dashboard_bridge::server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = BridgeConfig::from_env()?;
    tracing::info!(
        addr = %config.listen_addr,
        env = %config.env_name,
        version = %config.api_version,
        backend = %config.backend_url,
        "starting dashboard-bridge"
    );

    // Backend client
    let backend: Arc<dyn BackendApi> = Arc::new(HttpBackend::new(
        reqwest::Client::builder().build()?,
        config.backend_url.clone(),
    ));

    // Build application state
    let listen_addr = config.listen_addr;
    let state = AppState::build(config, backend).await?;

    // Start server
    let listener = match tokio::net::TcpListener::bind(listen_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::warn!(addr = %listen_addr, error = %e, "port is in use");
            return Err(e.into());
        }
    };
    tracing::info!(addr = %listen_addr, "server listening");

    server::serve(listener, state).await?;

    Ok(())
}
