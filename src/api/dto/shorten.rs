//! DTOs for the shortening endpoint.

use serde::Deserialize;

/// Query string of `POST /shorten`.
///
/// The URL is taken verbatim: no format validation or normalization.
#[derive(Debug, Deserialize)]
pub struct ShortenQuery {
    #[serde(rename = "originalUrl")]
    pub original_url: String,
}
