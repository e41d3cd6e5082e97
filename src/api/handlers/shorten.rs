//! Handler for the link shortening endpoint.

use axum::{
    extract::{Query, State, rejection::QueryRejection},
    http::HeaderMap,
};
use serde_json::json;
use tracing::{debug, info};

use crate::api::dto::shorten::ShortenQuery;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::request_origin::base_url_from_headers;

/// Creates a short link for a long URL.
///
/// # Endpoint
///
/// `POST /shorten?originalUrl=<url>`
///
/// # Response
///
/// `200 OK` with the short URL as a plain-text body:
///
/// ```text
/// http://localhost:8080/api/url/AbCd_123
/// ```
///
/// The prefix is the configured public base URL, or `scheme://host/` of the
/// incoming request when none is configured.
///
/// # Errors
///
/// - `400 Bad Request` if `originalUrl` is missing, or the base URL cannot be
///   derived from the request
/// - `409 Conflict` if the generated key already exists (every attempt collided)
pub async fn shorten_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<ShortenQuery>, QueryRejection>,
) -> Result<String, AppError> {
    let Query(query) = query.map_err(|e| {
        AppError::bad_request(
            "Missing or invalid originalUrl query parameter",
            json!({ "reason": e.body_text() }),
        )
    })?;

    info!(original_url = %query.original_url, "Received request to shorten URL");

    let base_url = match &state.public_base_url {
        Some(base) => base.clone(),
        None => base_url_from_headers(&headers)?,
    };

    let link = state.link_service.create(query.original_url).await?;
    let short_url = state.link_service.short_url(&base_url, &link.short_key);

    debug!(%short_url, "Generated short URL");

    Ok(short_url)
}
