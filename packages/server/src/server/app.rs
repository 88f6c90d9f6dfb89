//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use waylook_scan::Scanner;

use crate::server::routes::{health_handler, index_handler, scan_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub scanner: Arc<Scanner>,
}

/// Build the Axum application router
pub fn build_app(scanner: Arc<Scanner>, allowed_origins: Vec<String>) -> Router {
    let app_state = AppState { scanner };

    Router::new()
        .route("/", get(index_handler))
        .route("/api/scan", get(scan_handler))
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(app_state))
        .layer(cors_layer(&allowed_origins))
        .layer(TraceLayer::new_for_http())
}

/// Any origin when the list is empty, otherwise only the listed ones.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    if allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
}
