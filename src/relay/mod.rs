//! Relay subsystem: both ends of a payload check.
//!
//! # Data Flow
//! ```text
//! Initiator:
//!     payload stream + route + tracer
//!     → client.rs (POST {scheme}://{route}/listen, bounded by timeout)
//!     → RelayOutcome (Delivered / ReceiverFailed / Transport)
//!
//! Receiver:
//!     inbound body → receiver.rs (drain, count bytes) → 200 or 500
//! ```
//!
//! # Design Decisions
//! - One attempt per check; no retries
//! - The receiver's read-failure status is a distinct outcome, never folded into Delivered

pub mod client;
pub mod receiver;

pub use client::{RelayBuildError, RelayClient, RelayOutcome, RECEIVER_FAILURE_STATUS};
pub use receiver::drain;
