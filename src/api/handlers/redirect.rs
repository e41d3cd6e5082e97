//! Handler for short key redirects.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{debug, info};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short key to its original URL.
///
/// # Endpoint
///
/// `GET /{short_key}`
///
/// # Response
///
/// `302 Found` with the original URL in the `Location` header.
///
/// # Errors
///
/// - `404 Not Found` if no link has this key
/// - `500 Internal Server Error` if the stored URL cannot be sent as a header value
pub async fn redirect_handler(
    Path(short_key): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    info!(%short_key, "Received redirect request");

    let original_url = state
        .link_service
        .resolve(&short_key)
        .await?
        .ok_or_else(|| {
            AppError::not_found("Short link not found", json!({ "short_key": short_key }))
        })?;

    debug!(%original_url, "Found original URL");

    let location = HeaderValue::from_str(&original_url).map_err(|_| {
        AppError::internal(
            "Stored URL is not a valid redirect target",
            json!({ "short_key": short_key }),
        )
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}
