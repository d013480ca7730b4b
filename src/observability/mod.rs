//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!     → spans.rs (per-request spans with request ID and payload tracer)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - The payload tracer is recorded on the request span so check requests
//!   can be matched against receiver-side logs
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
pub mod spans;
