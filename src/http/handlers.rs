//! Request handlers for the four endpoints.

use std::time::Instant;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::http::response::{CheckOutcome, CheckResponse};
use crate::http::server::AppState;
use crate::http::tracer::PayloadTracer;
use crate::observability::metrics;
use crate::payload::{self, PayloadStream};
use crate::relay;

/// `GET /check/{route}`: relay the static payload.
pub async fn check(
    State(state): State<AppState>,
    Path(route): Path<String>,
    tracer: PayloadTracer,
) -> CheckResponse {
    let start = Instant::now();
    let bytes = state.payload.len();

    let outcome = match state.payload.stream().await {
        Ok(body) => relay_payload(&state, &route, body, bytes, &tracer).await,
        Err(e) => {
            tracing::error!(route = %route, error = %e, "Static payload unavailable");
            CheckOutcome::Unavailable {
                message: e.to_string(),
                bytes,
            }
        }
    };

    finish("check", outcome, bytes, start)
}

/// `GET /gencheck/{route}/{bytes}`: relay `bytes` pseudorandom bytes.
pub async fn generated_check(
    State(state): State<AppState>,
    Path((route, raw_bytes)): Path<(String, String)>,
    tracer: PayloadTracer,
) -> CheckResponse {
    let start = Instant::now();

    let outcome = match payload::parse_byte_count(&raw_bytes) {
        Ok(bytes) => relay_payload(&state, &route, payload::generate(bytes), bytes, &tracer).await,
        Err(e) => {
            tracing::debug!(route = %route, bytes = %raw_bytes, reason = %e, "Rejected generated check");
            CheckOutcome::Invalid {
                reason: e.to_string(),
                attempted: e.attempted(),
            }
        }
    };

    let bytes = match &outcome {
        CheckOutcome::Relayed { bytes, .. } => *bytes,
        _ => 0,
    };
    finish("gencheck", outcome, bytes, start)
}

async fn relay_payload(
    state: &AppState,
    route: &str,
    body: PayloadStream,
    bytes: u64,
    tracer: &PayloadTracer,
) -> CheckOutcome {
    tracing::debug!(route = %route, bytes, "Relaying payload");
    let outcome = state.relay.relay(route, body, bytes, tracer.value()).await;
    CheckOutcome::Relayed { outcome, bytes }
}

fn finish(kind: &'static str, outcome: CheckOutcome, bytes: u64, start: Instant) -> CheckResponse {
    let response = CheckResponse::from(outcome);
    let status = response.http_status();
    tracing::info!(
        kind,
        status = status.as_u16(),
        bytes = ?response.bytes,
        error = response.error.as_deref().unwrap_or(""),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Check finished"
    );
    metrics::record_check(kind, status.as_u16(), bytes, start);
    response
}

/// `POST /listen`: drain the body and report whether it arrived intact.
pub async fn listen(body: Body) -> StatusCode {
    match relay::drain(body).await {
        Ok(received) => {
            tracing::debug!(bytes = received, "Payload received");
            metrics::record_listen("ok", received);
            StatusCode::OK
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read inbound payload");
            metrics::record_listen("failed", 0);
            relay::RECEIVER_FAILURE_STATUS
        }
    }
}

/// `GET /pull`: stream the static payload back in chunks.
pub async fn pull(State(state): State<AppState>) -> Response {
    match payload::export(&state.payload).await {
        Ok(body) => (
            [(header::CONTENT_TYPE, "application/octet-stream")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Static payload unavailable for pull");
            metrics::record_pull("unavailable", 0);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
