//! Payload sources.
//!
//! # Data Flow
//! ```text
//! /check, /pull     → source.rs    (static payload, one cursor per request)
//! /gencheck         → generated.rs (fresh pseudorandom stream per request)
//! /pull             → export.rs    (chunked streaming body with completion guard)
//! ```
//!
//! # Design Decisions
//! - Every request gets its own read cursor; nothing seeks a shared handle
//! - Streams are bounded to the declared length and yield at most `CHUNK_SIZE` bytes at a time
//! - Length of the static payload is fixed at startup and never re-stat'ed

pub mod export;
pub mod generated;
pub mod source;

use bytes::Bytes;
use futures_util::stream::BoxStream;

pub use export::export;
pub use generated::{generate, parse_byte_count, ByteCountError};
pub use source::{PayloadError, StaticPayload};

/// Size of every chunk read from a payload source.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Byte stream handed to the relay client or to a response body.
pub type PayloadStream = BoxStream<'static, std::io::Result<Bytes>>;
