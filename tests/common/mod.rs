//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;

use payload_tester::config::RelayConfig;
use payload_tester::http::{TesterServer, X_PAYLOAD_TRACER};
use payload_tester::payload::StaticPayload;
use payload_tester::relay::{self, RelayClient};
use payload_tester::Shutdown;

/// One request observed by a test receiver.
#[derive(Debug, Clone)]
pub struct Received {
    pub bytes: u64,
    pub tracer: Option<String>,
    pub content_type: Option<String>,
    pub content_length: Option<String>,
    pub chunked: bool,
}

/// Everything a test receiver has drained so far.
#[derive(Default)]
pub struct Recorder {
    requests: Mutex<Vec<Received>>,
}

impl Recorder {
    pub fn requests(&self) -> Vec<Received> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn sorted_sizes(&self) -> Vec<u64> {
        let mut sizes: Vec<u64> = self.requests().iter().map(|r| r.bytes).collect();
        sizes.sort_unstable();
        sizes
    }
}

#[derive(Clone)]
struct ReceiverState {
    recorder: Arc<Recorder>,
    status: StatusCode,
    delay: Duration,
}

fn header_text(headers: &HeaderMap, name: &str) -> Option<String> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned)
}

async fn record(State(state): State<ReceiverState>, headers: HeaderMap, body: Body) -> StatusCode {
    let tracer = header_text(&headers, X_PAYLOAD_TRACER.as_str());
    let content_type = header_text(&headers, header::CONTENT_TYPE.as_str());
    let content_length = header_text(&headers, header::CONTENT_LENGTH.as_str());
    let chunked = headers.contains_key(header::TRANSFER_ENCODING);

    let bytes = relay::drain(body).await.unwrap_or(0);
    state.recorder.requests.lock().unwrap().push(Received {
        bytes,
        tracer,
        content_type,
        content_length,
        chunked,
    });

    tokio::time::sleep(state.delay).await;
    state.status
}

/// Start a `/listen` receiver that drains and records every request, then answers `status`.
pub async fn start_receiver(status: StatusCode) -> (SocketAddr, Arc<Recorder>) {
    start_slow_receiver(status, Duration::ZERO).await
}

/// Like [`start_receiver`], but waits `delay` before answering.
pub async fn start_slow_receiver(status: StatusCode, delay: Duration) -> (SocketAddr, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let state = ReceiverState {
        recorder: recorder.clone(),
        status,
        delay,
    };
    let app = Router::new().route("/listen", post(record)).with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, recorder)
}

/// A running tester instance.
pub struct Tester {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl Tester {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for Tester {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_tester(payload: StaticPayload, timeout_ms: u64) -> Tester {
    let relay = RelayClient::new(&RelayConfig {
        timeout_ms,
        ..RelayConfig::default()
    })
    .unwrap();
    let server = TesterServer::new(payload, relay);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    Tester { addr, shutdown }
}

/// Temporary file holding `contents`; removed when dropped.
pub fn payload_file(contents: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents).unwrap();
    file.flush().unwrap();
    file
}

/// Deterministic, non-repeating-looking test bytes.
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 251) as u8).collect()
}

/// Route with nothing listening behind it.
pub fn unreachable_route() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr.to_string()
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
