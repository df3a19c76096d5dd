use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// Cross-origin access for scanning stations and report dashboards.
pub fn scanning_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_DISPOSITION])
        .allow_origin(Any)
}
