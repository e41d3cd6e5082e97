//! HTTP request/response tracing middleware.

use axum::body::Body;
use axum::http::Request;
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{
    DefaultOnBodyChunk, DefaultOnEos, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse,
    TraceLayer,
};
use tracing::{Level, Span};

pub type LinkTraceLayer = TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    fn(&Request<Body>) -> Span,
    DefaultOnRequest,
    DefaultOnResponse,
    DefaultOnBodyChunk,
    DefaultOnEos,
    DefaultOnFailure,
>;

/// Opens the request span.
///
/// Only the path is recorded. The `/shorten` query string holds the caller's
/// full original URL, which is logged once by the handler instead.
fn make_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
    )
}

/// Tracing layer for the link routes.
///
/// The response is logged at `INFO` with status and latency in milliseconds.
/// 5xx responses (store failures) are also logged at `ERROR`. A `/keys` body
/// aborted mid-stream is reported through the same failure hook.
///
/// ```text
/// INFO request{method=POST path=/shorten}: finished processing request latency=3 ms status=200
/// INFO request{method=GET path=/AbCd_123}: finished processing request latency=1 ms status=302
/// ```
pub fn layer() -> LinkTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(make_span as fn(&Request<Body>) -> Span)
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
        .on_failure(
            DefaultOnFailure::new()
                .level(Level::ERROR)
                .latency_unit(LatencyUnit::Millis),
        )
}
