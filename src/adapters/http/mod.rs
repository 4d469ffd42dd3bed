//! HTTP adapter - REST API exposure of the advisory service.

pub mod advisory;

pub use advisory::{advisory_routes, AdvisoryAppState};

use std::time::Duration;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Assembles the full application router with the ambient middleware
/// stack (request tracing, CORS, request timeout).
pub fn app(state: AdvisoryAppState, server: &ServerConfig) -> Router {
    let cors = match cors_origins(server) {
        origins if origins.is_empty() => CorsLayer::permissive(),
        origins => CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    advisory_routes()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(TimeoutLayer::new(Duration::from_secs(
            server.request_timeout_secs,
        )))
        .with_state(state)
}

fn cors_origins(server: &ServerConfig) -> Vec<HeaderValue> {
    server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect()
}
