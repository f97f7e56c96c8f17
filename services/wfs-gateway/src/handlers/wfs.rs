//! WFS collection and item handlers.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use wfs_protocol::{FeatureQuery, Layer};

use crate::error::{GatewayError, GatewayResult};
use crate::metrics::record_gateway_request;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CollectionsResponse {
    pub collections: Vec<Layer>,
}

/// Query string accepted by `GET /api/wfs/items`.
///
/// Everything is taken as text: a `limit` that is not an integer counts as
/// absent rather than rejecting the request. Repeated keys keep their first value.
#[derive(Debug, Default, Deserialize)]
pub struct ItemsParams {
    #[serde(rename = "typeName")]
    pub type_name: Option<String>,
    #[serde(rename = "srsName")]
    pub srs_name: Option<String>,
    pub bbox: Option<String>,
    pub limit: Option<String>,
    pub cql: Option<String>,
    #[serde(rename = "propertyName")]
    pub property_name: Option<String>,
}

impl ItemsParams {
    /// Collect raw query pairs; the first occurrence of each key wins, unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "typeName" => &mut params.type_name,
                "srsName" => &mut params.srs_name,
                "bbox" => &mut params.bbox,
                "limit" => &mut params.limit,
                "cql" => &mut params.cql,
                "propertyName" => &mut params.property_name,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }

    /// Build the upstream query, filling in `default_srs` when no srsName was given.
    pub fn into_feature_query(self, default_srs: &str) -> GatewayResult<FeatureQuery> {
        let type_name = self
            .type_name
            .filter(|t| !t.is_empty())
            .ok_or(GatewayError::MissingParameter("typeName"))?;

        let srs_name = self.srs_name.unwrap_or_else(|| default_srs.to_string());
        let limit = self.limit.and_then(|l| l.trim().parse::<i64>().ok());

        Ok(FeatureQuery::new(type_name)
            .with_srs_name(Some(srs_name))
            .with_bbox(self.bbox)
            .with_limit(limit)
            .with_cql(self.cql)
            .with_property_name(self.property_name))
    }
}

/// GET /api/wfs/collections - List feature types from the upstream capabilities
///
/// Failures are not turned into a JSON body here; they fall through to the
/// default `GatewayError` rendering.
pub async fn list_collections_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> GatewayResult<Json<CollectionsResponse>> {
    let result = state.client.list_layers().await;

    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(e) => e.status_code(),
    };
    record_gateway_request("collections", status.as_u16());

    Ok(Json(CollectionsResponse {
        collections: result?,
    }))
}

/// GET /api/wfs/items - Proxy a GetFeature query and return the GeoJSON as-is
pub async fn get_items_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let params = ItemsParams::from_pairs(pairs);
    let query = match params.into_feature_query(&state.settings.default_srs) {
        Ok(query) => query,
        Err(e) => {
            record_gateway_request("items", e.status_code().as_u16());
            return e.into_json_response();
        }
    };

    match state.client.get_feature(query).await {
        Ok(features) => {
            record_gateway_request("items", StatusCode::OK.as_u16());
            Json(features).into_response()
        }
        Err(e) => {
            warn!(error = %e, timeout = e.is_timeout(), "GetFeature failed");
            record_gateway_request("items", StatusCode::INTERNAL_SERVER_ERROR.as_u16());
            crate::error::json_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
