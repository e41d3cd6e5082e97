//! API route configuration.

use crate::api::handlers::{keys_handler, shorten_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Link management routes.
///
/// # Endpoints
///
/// - `POST /shorten` - Create a short link (`originalUrl` query parameter)
/// - `GET  /keys`    - Stream every stored short key as a JSON array
pub fn link_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/keys", get(keys_handler))
}
