use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

/// Pins the allowed origin to the configured client URL when one is set,
/// otherwise stays permissive for local development.
pub fn cors_layer(client_url: Option<&str>) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match client_url.and_then(|url| url.parse::<HeaderValue>().ok()) {
        Some(origin) => base.allow_origin(origin),
        None => base.allow_origin(Any),
    }
}
