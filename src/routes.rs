//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /shorten`     - Create a short link
//! - `GET  /keys`        - Stream all short keys
//! - `GET  /health`      - Health check
//! - `GET  /{short_key}` - Redirect to the original URL
//!
//! Static paths win over `/{short_key}`, so keys equal to `keys`, `health` or
//! `shorten` are never reachable through the redirect route.
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Timeout** - Per-request deadline, cancelling the store call on expiry
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{timeout, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `request_timeout_secs` - deadline for producing response headers
pub fn app_router(state: AppState, request_timeout_secs: u64) -> NormalizePath<Router> {
    let router = Router::new()
        .merge(api::routes::link_routes())
        .route("/health", get(health_handler))
        .route("/{short_key}", get(redirect_handler))
        .with_state(state)
        .layer(timeout::layer(request_timeout_secs))
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
