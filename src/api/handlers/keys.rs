//! Handler streaming every stored short key.

use async_stream::stream;
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::header,
    response::IntoResponse,
};
use futures_util::{Stream, StreamExt};
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::domain::repositories::KeyStream;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::key_generator::is_well_formed_key;

/// Streams all short keys as a JSON array.
///
/// # Endpoint
///
/// `GET /keys`
///
/// # Response
///
/// ```json
/// ["ZWVmNWZk", "OGI2NzQ3"]
/// ```
///
/// Keys are written to the response body as the store produces them; the full
/// set is never buffered. Order is unspecified.
///
/// # Errors
///
/// The status line is sent before the first key is read, so a store failure
/// mid-stream aborts the body instead of producing an error response.
pub async fn keys_handler(State(state): State<AppState>) -> impl IntoResponse {
    info!("Client requested all short keys");

    let body = Body::from_stream(json_array(state.link_service.list_keys()));

    ([(header::CONTENT_TYPE, "application/json")], body)
}

/// Frames a key stream as the chunks of one JSON array.
fn json_array(mut keys: KeyStream) -> impl Stream<Item = Result<Bytes, AppError>> + Send + 'static {
    stream! {
        yield Ok::<Bytes, AppError>(Bytes::from_static(b"["));

        let mut first = true;
        let mut streamed = 0usize;

        while let Some(item) = keys.next().await {
            let key = match item {
                Ok(key) => key,
                Err(e) => {
                    error!(error = %e, streamed, "Key stream failed, aborting response");
                    yield Err(AppError::from(e));
                    return;
                }
            };

            if !is_well_formed_key(&key) {
                warn!(short_key = %key, "Found malformed key in response");
            }

            let encoded = match serde_json::to_string(&key) {
                Ok(encoded) => encoded,
                Err(e) => {
                    yield Err(AppError::internal(
                        "Failed to encode key",
                        json!({ "reason": e.to_string() }),
                    ));
                    return;
                }
            };

            let mut chunk = String::with_capacity(encoded.len() + 1);
            if !first {
                chunk.push(',');
            }
            chunk.push_str(&encoded);
            first = false;
            streamed += 1;

            yield Ok(Bytes::from(chunk));
        }

        yield Ok(Bytes::from_static(b"]"));
        debug!(streamed, "Completed streaming all keys");
    }
}
