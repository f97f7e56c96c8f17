//! HTTP client for the upstream WFS server.

use std::time::Instant;

use reqwest::{Client, Response};
use serde_json::Value;
use tracing::{debug, info, warn};
use wfs_protocol::{get_capabilities_kvp, parse_capabilities_bytes, FeatureQuery, Layer};

use crate::config::Settings;
use crate::error::GatewayResult;
use crate::metrics::{record_upstream_request, UpstreamOutcome};

/// Client for one WFS endpoint.
///
/// Credentials and timeout are fixed at construction; the client holds no
/// per-request state and is shared across handlers.
#[derive(Debug, Clone)]
pub struct WfsClient {
    http: Client,
    endpoint: String,
    username: String,
    password: String,
    default_workspace: String,
}

impl WfsClient {
    pub fn new(settings: &Settings) -> reqwest::Result<Self> {
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;

        Ok(Self {
            http,
            endpoint: settings.wfs_endpoint(),
            username: settings.geoserver_user.clone(),
            password: settings.geoserver_pass.clone(),
            default_workspace: settings.default_workspace.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch capabilities and flatten them into layers, in document order.
    pub async fn list_layers(&self) -> GatewayResult<Vec<Layer>> {
        let response = self.get("GetCapabilities", &get_capabilities_kvp()).await?;
        let body = response.bytes().await?;

        let layers = parse_capabilities_bytes(&body)?;
        debug!(count = layers.len(), "Parsed WFS capabilities");
        Ok(layers)
    }

    /// Run a GetFeature query and return the upstream GeoJSON untouched.
    pub async fn get_feature(&self, query: FeatureQuery) -> GatewayResult<Value> {
        let query = query.qualify_type_name(&self.default_workspace);
        let response = self.get("GetFeature", &query.to_kvp()).await?;
        Ok(response.json().await?)
    }

    /// Single authenticated GET against the WFS endpoint. Non-2xx is an error.
    async fn get(
        &self,
        request: &'static str,
        params: &[(&'static str, String)],
    ) -> GatewayResult<Response> {
        let start = Instant::now();

        let result = self
            .http
            .get(&self.endpoint)
            .basic_auth(&self.username, Some(&self.password))
            .query(params)
            .send()
            .await
            .and_then(Response::error_for_status);

        let elapsed = start.elapsed();
        match result {
            Ok(response) => {
                record_upstream_request(request, UpstreamOutcome::Success, elapsed);
                info!(
                    request = request,
                    status = response.status().as_u16(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "WFS upstream request completed"
                );
                Ok(response)
            }
            Err(e) => {
                record_upstream_request(request, UpstreamOutcome::from_error(&e), elapsed);
                warn!(
                    request = request,
                    error = %e,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "WFS upstream request failed"
                );
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_uses_wfs_endpoint() {
        let settings = Settings {
            geoserver_url: "http://geo.internal:8080/geoserver/".to_string(),
            ..Default::default()
        };
        let client = WfsClient::new(&settings).unwrap();
        assert_eq!(client.endpoint(), "http://geo.internal:8080/geoserver/wfs");
    }

    #[test]
    fn test_unreachable_upstream_is_upstream_error() {
        let settings = Settings {
            geoserver_url: "http://127.0.0.1:1".to_string(),
            request_timeout_seconds: 2,
            ..Default::default()
        };
        let client = WfsClient::new(&settings).unwrap();

        let err = tokio_test::block_on(client.list_layers()).unwrap_err();
        assert!(matches!(err, crate::error::GatewayError::Upstream(_)));
    }
}
