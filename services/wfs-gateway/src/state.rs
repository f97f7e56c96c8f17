//! Application state for the WFS gateway.

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusHandle;

use crate::client::WfsClient;
use crate::config::Settings;

/// Shared, read-only application state.
pub struct AppState {
    pub settings: Settings,

    /// Upstream WFS client (fixed credentials, shared connection pool).
    pub client: WfsClient,

    /// Prometheus handle, present when a recorder was installed.
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(settings: Settings) -> Result<Self> {
        let client = WfsClient::new(&settings).context("Failed to create WFS HTTP client")?;

        Ok(Self {
            settings,
            client,
            metrics_handle: None,
        })
    }

    pub fn with_metrics_handle(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}
