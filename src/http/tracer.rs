//! `X-Payload-Tracer` propagation.
//!
//! The tracer is opaque: never validated, never generated here. Whatever the
//! caller sent is copied onto the outbound relay request and echoed on the
//! response.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;

pub const X_PAYLOAD_TRACER: HeaderName = HeaderName::from_static("x-payload-tracer");

/// Tracer value of the inbound request, if one was sent.
#[derive(Debug, Clone, Default)]
pub struct PayloadTracer(pub Option<HeaderValue>);

impl PayloadTracer {
    pub fn value(&self) -> Option<&HeaderValue> {
        self.0.as_ref()
    }
}

impl<S> FromRequestParts<S> for PayloadTracer
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.headers.get(&X_PAYLOAD_TRACER).cloned()))
    }
}

/// Middleware echoing the request's tracer on every response, whatever the handler returned.
pub async fn echo_tracer(request: Request, next: Next) -> Response {
    let tracer = request.headers().get(&X_PAYLOAD_TRACER).cloned();
    let mut response = next.run(request).await;
    if let Some(tracer) = tracer {
        response.headers_mut().insert(X_PAYLOAD_TRACER, tracer);
    }
    response
}
