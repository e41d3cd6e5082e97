//! Per-request timeout middleware.

use std::time::Duration;
use tower_http::timeout::TimeoutLayer;

/// Bounds the time until response headers are produced.
///
/// Requests exceeding `seconds` are answered with `408 Request Timeout` and
/// their handler future is dropped, which cancels any in-flight store call.
/// Streamed response bodies (`GET /keys`) are not limited once headers are sent.
pub fn layer(seconds: u64) -> TimeoutLayer {
    TimeoutLayer::new(Duration::from_secs(seconds))
}
