//! Normalized layer description extracted from WFS capabilities.

use serde::{Deserialize, Serialize};

/// A feature type advertised by the upstream server.
///
/// Serializes as `{"name": ..., "title": ..., "bbox": [minx, miny, maxx, maxy]}`,
/// with `null` for anything the capabilities document left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Qualified feature type name (e.g. "topp:roads")
    pub name: Option<String>,

    /// Human-readable title
    pub title: Option<String>,

    /// WGS84 extent as [min_lon, min_lat, max_lon, max_lat]
    pub bbox: Option<[f64; 4]>,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            title: None,
            bbox: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_bbox(mut self, bbox: [f64; 4]) -> Self {
        self.bbox = Some(bbox);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_layer_serializes_nulls() {
        let layer = Layer::new("topp:roads");
        let value = serde_json::to_value(&layer).unwrap();
        assert_eq!(
            value,
            json!({"name": "topp:roads", "title": null, "bbox": null})
        );
    }

    #[test]
    fn test_layer_bbox_is_flat_array() {
        let layer = Layer::new("topp:states")
            .with_title("USA Population")
            .with_bbox([-124.7, 24.9, -66.9, 49.3]);
        let value = serde_json::to_value(&layer).unwrap();
        assert_eq!(value["bbox"], json!([-124.7, 24.9, -66.9, 49.3]));
        assert_eq!(value["title"], "USA Population");
    }
}
