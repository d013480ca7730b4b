//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing span, tracer echo)
//! - Bind server to listener and shut down on signal

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::http::handlers;
use crate::http::tracer::echo_tracer;
use crate::observability::spans::make_request_span;
use crate::payload::StaticPayload;
use crate::relay::RelayClient;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub payload: StaticPayload,
    pub relay: RelayClient,
}

/// HTTP server for the payload tester.
pub struct TesterServer {
    router: Router,
}

impl TesterServer {
    pub fn new(payload: StaticPayload, relay: RelayClient) -> Self {
        let state = AppState { payload, relay };
        Self {
            router: Self::build_router(state),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/check/{route}", get(handlers::check))
            .route("/gencheck/{route}/{bytes}", get(handlers::generated_check))
            .route("/listen", post(handlers::listen))
            .route("/pull", get(handlers::pull))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(middleware::from_fn(echo_tracer)),
            )
    }

    /// The router, for serving elsewhere or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RelayConfig;
    use crate::http::response::CheckResponse;
    use crate::http::tracer::X_PAYLOAD_TRACER;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use bytes::Bytes;
    use futures_util::stream;
    use tower::ServiceExt;

    fn router(payload: &'static [u8]) -> Router {
        let relay = RelayClient::new(&RelayConfig {
            timeout_ms: 500,
            ..RelayConfig::default()
        })
        .unwrap();
        TesterServer::new(StaticPayload::from_bytes(Bytes::from_static(payload)), relay).router()
    }

    async fn check_body(response: axum::response::Response) -> CheckResponse {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn listen_accepts_any_body_and_echoes_tracer() {
        let response = router(b"")
            .oneshot(
                Request::post("/listen")
                    .header(X_PAYLOAD_TRACER, "trace-123")
                    .body(Body::from(vec![0u8; 100_000]))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[X_PAYLOAD_TRACER], "trace-123");
        assert!(response.headers().contains_key("x-request-id"));
        assert!(to_bytes(response.into_body(), usize::MAX).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn listen_read_failure_is_internal_error_without_body() {
        let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from_static(b"abc")),
            Err(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated")),
        ];
        let response = router(b"")
            .oneshot(
                Request::post("/listen")
                    .header(X_PAYLOAD_TRACER, "broken")
                    .body(Body::from_stream(stream::iter(chunks)))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[X_PAYLOAD_TRACER], "broken");
        assert!(to_bytes(response.into_body(), usize::MAX).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn listen_requires_post() {
        let response = router(b"")
            .oneshot(Request::get("/listen").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn pull_returns_payload() {
        let response = router(b"static payload bytes")
            .oneshot(Request::get("/pull").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"static payload bytes");
    }

    #[tokio::test]
    async fn gencheck_rejects_negative_counts() {
        let response = router(b"")
            .oneshot(
                Request::get("/gencheck/127.0.0.1:1/-5")
                    .header(X_PAYLOAD_TRACER, "neg")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[X_PAYLOAD_TRACER], "neg");
        assert_eq!(
            check_body(response).await,
            CheckResponse {
                status: Some(400),
                error: Some("Cannot send negative amount of bytes".into()),
                bytes: Some(-5),
            }
        );
    }

    #[tokio::test]
    async fn gencheck_rejects_non_integer_counts() {
        let response = router(b"")
            .oneshot(Request::get("/gencheck/127.0.0.1:1/ten").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            check_body(response).await,
            CheckResponse {
                status: Some(400),
                error: Some("Could not parse body size in request URL".into()),
                bytes: None,
            }
        );
    }

    #[tokio::test]
    async fn no_tracer_header_means_none_echoed() {
        let response = router(b"")
            .oneshot(Request::post("/listen").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(!response.headers().contains_key(X_PAYLOAD_TRACER));
    }
}
