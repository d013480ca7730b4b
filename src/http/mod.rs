//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace span, tracer echo)
//!     → handlers.rs
//!         /check, /gencheck → payload source → relay client → response.rs
//!         /listen           → relay receiver
//!         /pull             → payload export
//!     → Send to client
//! ```

pub mod handlers;
pub mod response;
pub mod server;
pub mod tracer;

pub use response::{CheckOutcome, CheckResponse};
pub use server::{AppState, TesterServer};
pub use tracer::{PayloadTracer, X_PAYLOAD_TRACER};
