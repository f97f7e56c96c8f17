//! Stub WFS upstream for gateway integration tests.
//!
//! Binds an axum router to an ephemeral local port, records every request it
//! receives and answers GetCapabilities / GetFeature with canned responses.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub const CAPABILITIES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<wfs:WFS_Capabilities version="1.1.0"
    xmlns:wfs="http://www.opengis.net/wfs"
    xmlns:ows="http://www.opengis.net/ows">
  <wfs:FeatureTypeList>
    <wfs:FeatureType>
      <wfs:Name>topp:states</wfs:Name>
      <wfs:Title>USA Population</wfs:Title>
      <ows:WGS84BoundingBox>
        <ows:LowerCorner>-124.731422 24.955967</ows:LowerCorner>
        <ows:UpperCorner>-66.969849 49.371735</ows:UpperCorner>
      </ows:WGS84BoundingBox>
    </wfs:FeatureType>
    <wfs:FeatureType>
      <wfs:Name>tiger:roads</wfs:Name>
      <wfs:Title>Manhattan roads</wfs:Title>
      <ows:WGS84BoundingBox>
        <ows:LowerCorner>-74.02 40.70</ows:LowerCorner>
        <ows:UpperCorner>-73.90 40.88</ows:UpperCorner>
      </ows:WGS84BoundingBox>
    </wfs:FeatureType>
    <wfs:FeatureType>
      <wfs:Name>topp:tasmania_water_bodies</wfs:Name>
    </wfs:FeatureType>
  </wfs:FeatureTypeList>
</wfs:WFS_Capabilities>
"#;

pub const EMPTY_CAPABILITIES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<wfs:WFS_Capabilities version="1.1.0"
    xmlns:wfs="http://www.opengis.net/wfs"
    xmlns:ows="http://www.opengis.net/ows">
  <wfs:FeatureTypeList/>
</wfs:WFS_Capabilities>
"#;

pub fn feature_collection() -> serde_json::Value {
    serde_json::json!({
        "type": "FeatureCollection",
        "totalFeatures": 1,
        "features": [{
            "type": "Feature",
            "id": "roads.1",
            "geometry": {"type": "LineString", "coordinates": [[-73.99, 40.73], [-73.98, 40.74]]},
            "geometry_name": "the_geom",
            "properties": {"NAME": "Broadway", "TYPE": "highway"}
        }],
        "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::4326"}}
    })
}

/// A request as seen by the stub upstream.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub params: Vec<(String, String)>,
    pub authorization: Option<String>,
}

impl RecordedRequest {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_param(&self, key: &str) -> bool {
        self.param(key).is_some()
    }
}

/// Canned reply for one WFS operation.
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: String,
    pub delay: Option<Duration>,
}

impl StubResponse {
    pub fn xml(body: &str) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: "text/xml",
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn json(value: serde_json::Value) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: "application/json",
            body: value.to_string(),
            delay: None,
        }
    }

    pub fn status(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Clone)]
struct StubState {
    capabilities: StubResponse,
    features: StubResponse,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct StubUpstream {
    /// Value for GEOSERVER_URL; the WFS endpoint lives at `<base_url>/wfs`.
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl StubUpstream {
    pub async fn start(capabilities: StubResponse, features: StubResponse) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            capabilities,
            features,
            requests: Arc::clone(&requests),
        };

        let app = Router::new()
            .route("/geoserver/wfs", get(wfs_handler))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local_addr");

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        });
        tokio::spawn(async move { server.await });

        Self {
            base_url: format!("http://{addr}/geoserver"),
            requests,
            shutdown: Some(shutdown_tx),
        }
    }

    /// Stub that serves the standard capabilities and feature collection.
    pub async fn standard() -> Self {
        Self::start(
            StubResponse::xml(CAPABILITIES_XML),
            StubResponse::json(feature_collection()),
        )
        .await
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn single_request(&self) -> RecordedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one upstream request");
        requests.into_iter().next().expect("one request")
    }
}

impl Drop for StubUpstream {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

async fn wfs_handler(
    State(state): State<StubState>,
    uri: Uri,
    headers: HeaderMap,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let operation = params
        .iter()
        .find(|(k, _)| k == "request")
        .map(|(_, v)| v.clone())
        .unwrap_or_default();

    state.requests.lock().expect("requests lock").push(RecordedRequest {
        path: uri.path().to_string(),
        params,
        authorization,
    });

    let reply = if operation == "GetCapabilities" {
        state.capabilities
    } else {
        state.features
    };

    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }

    (
        reply.status,
        [(header::CONTENT_TYPE, reply.content_type)],
        reply.body,
    )
        .into_response()
}
