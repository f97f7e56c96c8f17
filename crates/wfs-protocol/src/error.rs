//! Error types for WFS capabilities parsing.

use thiserror::Error;

/// Result type alias using CapabilitiesError.
pub type CapabilitiesResult<T> = Result<T, CapabilitiesError>;

/// Failure to turn a GetCapabilities response into layers.
#[derive(Debug, Error)]
pub enum CapabilitiesError {
    #[error("XML parsing error at position {position}: {source}")]
    Xml {
        position: usize,
        #[source]
        source: quick_xml::Error,
    },

    #[error("Malformed capabilities document: {0}")]
    Malformed(String),

    #[error("Invalid bounding box corner '{value}' for layer {layer}")]
    InvalidCorner { layer: String, value: String },
}
