//! Error taxonomy for the gateway.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use wfs_protocol::CapabilitiesError;

/// Result type alias using GatewayError.
pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// A required query parameter was absent or empty.
    #[error("Missing {0}")]
    MissingParameter(&'static str),

    /// Network failure, timeout, non-2xx status or undecodable body.
    #[error("WFS upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// The capabilities document could not be parsed.
    #[error("Invalid WFS capabilities: {0}")]
    Parse(#[from] CapabilitiesError),
}

/// JSON error body: `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            GatewayError::Upstream(_) | GatewayError::Parse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, GatewayError::Upstream(e) if e.is_timeout())
    }

    /// Render as `{"error": "<message>"}` with this error's status code.
    pub fn into_json_response(self) -> Response {
        json_error(self.status_code(), self.to_string())
    }
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Default rendering: validation errors become JSON 400s, everything else is
/// an opaque plain-text 500.
impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match self {
            GatewayError::MissingParameter(_) => self.into_json_response(),
            other => {
                tracing::error!(error = %other, "Unhandled gateway error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                    "Internal Server Error",
                )
                    .into_response()
            }
        }
    }
}
