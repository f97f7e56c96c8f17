//! HTTP request handlers for the WFS gateway.

pub mod health;
pub mod wfs;
