//! HTTP payload relay tester library.
//!
//! One instance relays a payload (a static file or generated bytes) to a
//! remote instance's `/listen` endpoint and reports the outcome; the same
//! instance receives payloads on `/listen` and serves its static payload on
//! `/pull`.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod payload;
pub mod relay;

pub use config::schema::TesterConfig;
pub use http::TesterServer;
pub use lifecycle::Shutdown;
