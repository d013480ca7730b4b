//! Metrics collection and exposition.
//!
//! # Metrics
//! - `payload_tester_checks_total` (counter): relay attempts by kind, status
//! - `payload_tester_check_duration_seconds` (histogram): time spent per check
//! - `payload_tester_check_bytes_total` (counter): payload bytes offered to receivers
//! - `payload_tester_listen_total` (counter): inbound payloads by outcome
//! - `payload_tester_received_bytes_total` (counter): bytes drained by the receiver
//! - `payload_tester_pulls_total` / `payload_tester_pulled_bytes_total`: `/pull` exports
//!
//! Recording is a no-op until a recorder is installed.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one check. `status` is the outer HTTP status returned to the caller.
pub fn record_check(kind: &'static str, status: u16, bytes: u64, start: Instant) {
    let status = status.to_string();
    counter!("payload_tester_checks_total", "kind" => kind, "status" => status).increment(1);
    counter!("payload_tester_check_bytes_total", "kind" => kind).increment(bytes);
    histogram!("payload_tester_check_duration_seconds", "kind" => kind).record(start.elapsed().as_secs_f64());
}

pub fn record_listen(outcome: &'static str, bytes: u64) {
    counter!("payload_tester_listen_total", "outcome" => outcome).increment(1);
    counter!("payload_tester_received_bytes_total").increment(bytes);
}

pub fn record_pull(outcome: &'static str, bytes: u64) {
    counter!("payload_tester_pulls_total", "outcome" => outcome).increment(1);
    counter!("payload_tester_pulled_bytes_total").increment(bytes);
}
