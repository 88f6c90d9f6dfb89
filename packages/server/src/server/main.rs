// Main entry point for the scan API server

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use waylook_scan::Scanner;
use waylook_server::{server::build_app, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,waylook_scan=debug,waylook_server=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting WayLook API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        cdx = %config.archive.cdx_endpoint,
        timeout_secs = config.archive.timeout.as_secs(),
        "Configuration loaded"
    );

    let scanner = Scanner::from_config(config.archive.clone())
        .context("Failed to build archive client")?;

    // Build application
    let app = build_app(Arc::new(scanner), config.allowed_origins.clone());

    // Start server
    let addr = config.bind_addr();
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Scan endpoint: http://localhost:{}/api/scan", config.port);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
