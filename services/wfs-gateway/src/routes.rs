//! Router assembly.

use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Extension, Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::AllowedOrigins;
use crate::handlers;
use crate::state::AppState;

/// Build the full application router.
///
/// CORS applies to `/api/*` only; `/health` and `/metrics` are for operators.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.settings.cors_origins());

    let api = Router::new()
        .route(
            "/wfs/collections",
            get(handlers::wfs::list_collections_handler),
        )
        .route("/wfs/items", get(handlers::wfs::get_items_handler))
        .layer(cors);

    Router::new()
        .nest("/api", api)
        .route("/health", get(handlers::health::health_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
}

pub fn cors_layer(origins: &AllowedOrigins) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    match origins {
        AllowedOrigins::Any => layer.allow_origin(Any),
        AllowedOrigins::List(list) => {
            let values: Vec<HeaderValue> = list
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!(origin = %origin, "Ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();
            layer.allow_origin(AllowOrigin::list(values))
        }
    }
}
