//! Chunked export of the static payload for `/pull`.

use axum::body::Body;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};

use super::{PayloadError, PayloadStream, StaticPayload};
use crate::observability::metrics;

/// How one export ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub outcome: &'static str,
    pub sent: u64,
    pub expected: u64,
}

type Report = Box<dyn FnOnce(ExportSummary) + Send>;

/// Tracks one export. Owned by the body stream and dropped with it, so it
/// reports on every exit path: completion, I/O failure, or caller disconnect.
struct ExportProgress {
    expected: u64,
    sent: u64,
    failed: bool,
    report: Option<Report>,
}

impl ExportProgress {
    fn observe(&mut self, chunk: &std::io::Result<Bytes>) {
        match chunk {
            Ok(bytes) => self.sent += bytes.len() as u64,
            Err(e) => {
                self.failed = true;
                tracing::error!(error = %e, sent = self.sent, "Payload read failed mid-export");
            }
        }
    }

    fn outcome(&self) -> &'static str {
        if self.failed {
            "failed"
        } else if self.sent < self.expected {
            "aborted"
        } else {
            "complete"
        }
    }
}

impl Drop for ExportProgress {
    fn drop(&mut self) {
        if let Some(report) = self.report.take() {
            report(ExportSummary {
                outcome: self.outcome(),
                sent: self.sent,
                expected: self.expected,
            });
        }
    }
}

fn log_export(summary: ExportSummary) {
    if summary.outcome == "complete" {
        tracing::debug!(bytes = summary.sent, "Payload export complete");
    } else {
        tracing::warn!(
            sent = summary.sent,
            expected = summary.expected,
            outcome = summary.outcome,
            "Payload export ended early"
        );
    }
    metrics::record_pull(summary.outcome, summary.sent);
}

/// Wrap `stream` so that `report` runs exactly once, when the stream is dropped.
fn tracked(
    stream: PayloadStream,
    expected: u64,
    report: Report,
) -> impl Stream<Item = std::io::Result<Bytes>> + Send + 'static {
    let mut progress = ExportProgress {
        expected,
        sent: 0,
        failed: false,
        report: Some(report),
    };

    // `observe` borrows the whole guard, so the closure owns it.
    stream.map(move |chunk| {
        progress.observe(&chunk);
        chunk
    })
}

/// Build a streaming response body over a fresh cursor of `payload`.
///
/// Chunks are forwarded as they are read; nothing beyond the current chunk is buffered.
pub async fn export(payload: &StaticPayload) -> Result<Body, PayloadError> {
    let stream = payload.stream().await?;
    Ok(Body::from_stream(tracked(stream, payload.len(), Box::new(log_export))))
}
