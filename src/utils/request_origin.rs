//! Base URL derivation from HTTP request headers.

use crate::AppError;
use axum::http::{HeaderMap, header};
use serde_json::json;
use url::Url;

/// Builds the public base URL (`scheme://host/`) of the current request.
///
/// The host, including any port, comes from the `Host` header and must be a
/// bare `host[:port]`. The scheme is taken from `X-Forwarded-Proto` when it is
/// `http` or `https`, otherwise `http` is assumed.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if:
/// - The `Host` header is missing or empty
/// - The header value contains invalid UTF-8
/// - The value carries anything besides host and port (path, query,
///   fragment, userinfo)
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert(header::HOST, "sho.rt:8080".parse().unwrap());
///
/// assert_eq!(base_url_from_headers(&headers).unwrap(), "http://sho.rt:8080/");
/// ```
pub fn base_url_from_headers(headers: &HeaderMap) -> Result<String, AppError> {
    let host = headers
        .get(header::HOST)
        .ok_or_else(|| AppError::bad_request("Missing Host header", json!({})))?
        .to_str()
        .map_err(|_| AppError::bad_request("Invalid Host header", json!({})))?
        .trim();

    if host.is_empty() {
        return Err(AppError::bad_request("Missing Host header", json!({})));
    }

    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(',').next().unwrap_or(v).trim())
        .filter(|v| v.eq_ignore_ascii_case("https") || v.eq_ignore_ascii_case("http"))
        .map(|v| v.to_ascii_lowercase())
        .unwrap_or_else(|| "http".to_string());

    let invalid = || AppError::bad_request("Invalid Host header", json!({ "host": host }));

    let base = Url::parse(&format!("{scheme}://{host}/")).map_err(|_| invalid())?;

    let bare = base.host_str().is_some_and(|h| !h.is_empty())
        && base.username().is_empty()
        && base.password().is_none()
        && base.path() == "/"
        && base.query().is_none()
        && base.fragment().is_none();

    if !bare {
        return Err(invalid());
    }

    Ok(base.to_string())
}
