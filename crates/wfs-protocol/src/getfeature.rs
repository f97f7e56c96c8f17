//! WFS GetFeature request parameters.

use crate::{GEOJSON_OUTPUT_FORMAT, WFS_VERSION};

/// A GetFeature query as accepted from callers.
///
/// Optional fields are forwarded only when they carry a value: empty strings
/// and a limit of `0` are dropped, so `limit=0` means "no limit".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureQuery {
    pub type_name: String,
    pub srs_name: Option<String>,
    pub bbox: Option<String>,
    pub limit: Option<i64>,
    pub cql: Option<String>,
    pub property_name: Option<String>,
}

impl FeatureQuery {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Default::default()
        }
    }

    pub fn with_srs_name(mut self, srs_name: Option<String>) -> Self {
        self.srs_name = srs_name;
        self
    }

    pub fn with_bbox(mut self, bbox: Option<String>) -> Self {
        self.bbox = bbox;
        self
    }

    pub fn with_limit(mut self, limit: Option<i64>) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_cql(mut self, cql: Option<String>) -> Self {
        self.cql = cql;
        self
    }

    pub fn with_property_name(mut self, property_name: Option<String>) -> Self {
        self.property_name = property_name;
        self
    }

    /// Prefix an unqualified type name with `workspace`.
    ///
    /// Names that already carry a `prefix:` and empty workspaces are left alone.
    pub fn qualify_type_name(mut self, workspace: &str) -> Self {
        if !workspace.is_empty() && !self.type_name.contains(':') {
            self.type_name = format!("{}:{}", workspace, self.type_name);
        }
        self
    }

    /// KVP parameters for the upstream GetFeature request, in request order.
    pub fn to_kvp(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("service", "WFS".to_string()),
            ("version", WFS_VERSION.to_string()),
            ("request", "GetFeature".to_string()),
            ("typeName", self.type_name.clone()),
            ("outputFormat", GEOJSON_OUTPUT_FORMAT.to_string()),
        ];

        if let Some(srs) = non_empty(&self.srs_name) {
            params.push(("srsName", srs.to_string()));
        }
        if let Some(bbox) = non_empty(&self.bbox) {
            params.push(("bbox", bbox.to_string()));
        }
        if let Some(limit) = self.limit.filter(|l| *l != 0) {
            params.push(("maxFeatures", limit.to_string()));
        }
        if let Some(cql) = non_empty(&self.cql) {
            params.push(("cql_filter", cql.to_string()));
        }
        if let Some(property_name) = non_empty(&self.property_name) {
            params.push(("propertyName", property_name.to_string()));
        }

        params
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
