//! WFS Gateway Server
//!
//! Read-only REST front for an OGC WFS server.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use wfs_gateway::build_router;
use wfs_gateway::config::Settings;
use wfs_gateway::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Exits on unparseable numeric settings
    let settings = Settings::parse();

    init_tracing(&settings);

    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    info!(
        environment = %settings.environment,
        upstream = %settings.wfs_endpoint(),
        default_srs = %settings.default_srs,
        timeout_secs = settings.request_timeout_seconds,
        "Starting WFS gateway"
    );

    let addr = settings.listen_addr();
    let state = match AppState::new(settings) {
        Ok(state) => Arc::new(state.with_metrics_handle(prometheus_handle)),
        Err(e) => {
            tracing::error!("Failed to initialize application state: {:#}", e);
            std::process::exit(1);
        }
    };

    let app = build_router(state);

    info!("WFS gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server failed")?;

    Ok(())
}

fn init_tracing(settings: &Settings) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    if settings.is_development() {
        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .json()
            .init();
    }
}
