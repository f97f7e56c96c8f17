//! WFS Gateway Service Library
//!
//! Exposes a small read-only REST surface over an OGC WFS 1.1.0 server
//! (typically GeoServer): a normalized layer list built from GetCapabilities,
//! and GeoJSON passthrough for GetFeature queries.

pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod routes;
pub mod state;

pub use routes::build_router;
