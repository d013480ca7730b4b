//! Outbound relay of a payload to a remote receiver.

use std::time::Duration;

use axum::http::{header, HeaderValue, StatusCode};
use reqwest::Body;

use crate::config::{RelayConfig, Scheme};
use crate::http::tracer::X_PAYLOAD_TRACER;
use crate::payload::PayloadStream;

/// Status the receiver answers with when it could not read the whole body.
pub const RECEIVER_FAILURE_STATUS: StatusCode = StatusCode::INTERNAL_SERVER_ERROR;

/// Result of one relay attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// The remote answered with a status other than [`RECEIVER_FAILURE_STATUS`].
    Delivered(StatusCode),
    /// The remote reported that it failed while reading the request body.
    ReceiverFailed(StatusCode),
    /// No response: connect failure, timeout, reset, bad URL.
    Transport(String),
}

impl RelayOutcome {
    fn from_status(status: StatusCode) -> Self {
        if status == RECEIVER_FAILURE_STATUS {
            RelayOutcome::ReceiverFailed(status)
        } else {
            RelayOutcome::Delivered(status)
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("could not build relay HTTP client: {0}")]
pub struct RelayBuildError(#[from] reqwest::Error);

/// HTTP client that posts payloads to `{scheme}://{route}/listen`.
#[derive(Debug, Clone)]
pub struct RelayClient {
    client: reqwest::Client,
    scheme: Scheme,
    timeout: Duration,
}

impl RelayClient {
    pub fn new(config: &RelayConfig) -> Result<Self, RelayBuildError> {
        let timeout = config.timeout();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .no_proxy()
            .build()?;

        Ok(Self {
            client,
            scheme: config.scheme,
            timeout,
        })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Receiver URL for a caller-supplied route. The route is not validated.
    pub fn listen_url(&self, route: &str) -> String {
        format!("{}://{}/listen", self.scheme, route)
    }

    /// POST the `len` bytes of `body` to the receiver at `route`, forwarding `tracer` if present.
    ///
    /// `len` is declared as `Content-Length`, so receivers see a sized body rather
    /// than a chunked one. The payload stream is consumed (or dropped) before this returns.
    pub async fn relay(
        &self,
        route: &str,
        body: PayloadStream,
        len: u64,
        tracer: Option<&HeaderValue>,
    ) -> RelayOutcome {
        let url = self.listen_url(route);

        let mut request = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "text/plain")
            .header(header::CONTENT_LENGTH, len)
            .body(Body::wrap_stream(body));
        if let Some(tracer) = tracer {
            request = request.header(X_PAYLOAD_TRACER, tracer.clone());
        }

        match request.send().await {
            Ok(response) => {
                let outcome = RelayOutcome::from_status(response.status());
                tracing::debug!(url = %url, status = %response.status(), "Relay answered");
                outcome
            }
            Err(e) => {
                tracing::warn!(url = %url, timeout = e.is_timeout(), error = %e, "Relay failed");
                RelayOutcome::Transport(format!("Error while sending request: {}", error_chain(&e)))
            }
        }
    }
}

/// `reqwest` keeps the useful part (connection refused, DNS, ...) in the source chain.
fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
