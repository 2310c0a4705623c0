// File: services/wheretomeet_backend/src/main.rs
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use wheretomeet_backend::{app, app_state::AppState};
use wheretomeet_common::init_from_config;
use wheretomeet_config::load_config;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Arc::new(load_config()?);
    // Held for the process lifetime so buffered file logs are flushed.
    let _log_guard = init_from_config(&config.logging);

    let state = AppState::new(config.clone());
    let app = app(&state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
