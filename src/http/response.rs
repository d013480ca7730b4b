//! Uniform reply for check requests.
//!
//! # Mapping
//! ```text
//! Invalid(reason)            → status=400,  error=reason,          bytes=attempted
//! Relayed(Transport(msg))    → status=None, error=msg,             bytes=n   (HTTP 500)
//! Relayed(ReceiverFailed(c)) → status=c,    error=remote failure,  bytes=n
//! Relayed(Delivered(c))      → status=c,    error=None,            bytes=n
//! Unavailable(msg)           → status=None, error=msg,             bytes=n   (HTTP 500)
//! ```
//! The HTTP status of the reply is `status` when present, otherwise 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::relay::RelayOutcome;

pub const REMOTE_READ_FAILURE: &str = "Remote server failed while reading request body";

/// Wire shape returned by `/check` and `/gencheck`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub bytes: Option<i64>,
}

/// Everything a check can end in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Request parameters rejected before any relay attempt.
    Invalid { reason: String, attempted: Option<i64> },
    /// One relay attempt was made.
    Relayed { outcome: RelayOutcome, bytes: u64 },
    /// The static payload could not be opened for this request.
    Unavailable { message: String, bytes: u64 },
}

fn byte_count(n: u64) -> Option<i64> {
    i64::try_from(n).ok()
}

impl From<CheckOutcome> for CheckResponse {
    fn from(outcome: CheckOutcome) -> Self {
        match outcome {
            CheckOutcome::Invalid { reason, attempted } => CheckResponse {
                status: Some(StatusCode::BAD_REQUEST.as_u16()),
                error: Some(reason),
                bytes: attempted,
            },
            CheckOutcome::Relayed { outcome, bytes } => match outcome {
                RelayOutcome::Transport(message) => CheckResponse {
                    status: None,
                    error: Some(message),
                    bytes: byte_count(bytes),
                },
                RelayOutcome::ReceiverFailed(status) => CheckResponse {
                    status: Some(status.as_u16()),
                    error: Some(REMOTE_READ_FAILURE.to_string()),
                    bytes: byte_count(bytes),
                },
                RelayOutcome::Delivered(status) => CheckResponse {
                    status: Some(status.as_u16()),
                    error: None,
                    bytes: byte_count(bytes),
                },
            },
            CheckOutcome::Unavailable { message, bytes } => CheckResponse {
                status: None,
                error: Some(message),
                bytes: byte_count(bytes),
            },
        }
    }
}

impl CheckResponse {
    /// HTTP status for the reply carrying this body.
    pub fn http_status(&self) -> StatusCode {
        self.status
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for CheckResponse {
    fn into_response(self) -> Response {
        (self.http_status(), Json(self)).into_response()
    }
}
