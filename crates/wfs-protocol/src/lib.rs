//! OGC Web Feature Service (WFS) protocol support.
//!
//! Covers the client side of WFS 1.1.0:
//! - KVP request parameters for GetCapabilities and GetFeature
//! - Parsing GetCapabilities documents into a flat layer list
//!
//! # Example
//!
//! ```rust
//! use wfs_protocol::{parse_capabilities, FeatureQuery};
//!
//! let xml = r#"<wfs:WFS_Capabilities xmlns:wfs="http://www.opengis.net/wfs">
//!   <wfs:FeatureTypeList>
//!     <wfs:FeatureType><wfs:Name>topp:roads</wfs:Name></wfs:FeatureType>
//!   </wfs:FeatureTypeList>
//! </wfs:WFS_Capabilities>"#;
//!
//! let layers = parse_capabilities(xml).unwrap();
//! assert_eq!(layers[0].name.as_deref(), Some("topp:roads"));
//!
//! let params = FeatureQuery::new("topp:roads").with_limit(Some(10)).to_kvp();
//! assert!(params.contains(&("maxFeatures", "10".to_string())));
//! ```

pub mod capabilities;
pub mod error;
pub mod getfeature;
pub mod layer;

pub use capabilities::{get_capabilities_kvp, parse_capabilities, parse_capabilities_bytes};
pub use error::{CapabilitiesError, CapabilitiesResult};
pub use getfeature::FeatureQuery;
pub use layer::Layer;

/// WFS protocol version spoken to the upstream server.
pub const WFS_VERSION: &str = "1.1.0";

/// Output format requested for GetFeature responses.
pub const GEOJSON_OUTPUT_FORMAT: &str = "application/json";

/// XML namespace URIs used in WFS 1.1.0 capabilities documents.
pub mod namespaces {
    /// `wfs` namespace (FeatureType, Name, Title)
    pub const WFS: &str = "http://www.opengis.net/wfs";
    /// `ows` namespace (WGS84BoundingBox, LowerCorner, UpperCorner)
    pub const OWS: &str = "http://www.opengis.net/ows";
}
