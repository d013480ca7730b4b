//! Per-request spans.

use axum::body::Body;
use axum::http::Request;
use tracing::Span;

use crate::http::tracer::X_PAYLOAD_TRACER;

/// Span for `TraceLayer`, carrying the request ID and the payload tracer.
pub fn make_request_span(request: &Request<Body>) -> Span {
    let header = |name: &str| {
        request
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_owned()
    };

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %header("x-request-id"),
        tracer = %header(X_PAYLOAD_TRACER.as_str()),
    )
}
