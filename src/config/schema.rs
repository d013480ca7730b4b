//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the payload tester.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TesterConfig {
    /// Listener configuration (bind address, port).
    pub listener: ListenerConfig,

    /// Outbound relay settings.
    pub relay: RelayConfig,

    /// Static payload settings.
    pub payload: PayloadConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Address to bind on, without the port (e.g., "0.0.0.0").
    pub bind_address: String,

    /// Port to listen on. Usually supplied through the `PORT` environment variable.
    pub port: Option<u16>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: None,
        }
    }
}

impl ListenerConfig {
    /// `host:port` string for binding. `None` until a port is known.
    pub fn socket_address(&self) -> Option<String> {
        self.port.map(|port| format!("{}:{}", self.bind_address, port))
    }
}

/// Scheme used for outbound relay URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outbound relay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Scheme for `{scheme}://{route}/listen`.
    pub scheme: Scheme,

    /// Time to wait for the remote receiver, in milliseconds.
    /// Covers connect, request upload and response headers.
    pub timeout_ms: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            scheme: Scheme::Http,
            timeout_ms: 5_000,
        }
    }
}

impl RelayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Static payload configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PayloadConfig {
    /// File sent by `/check` and served by `/pull`.
    pub path: PathBuf,

    /// Read the whole file into memory at startup instead of opening it per request.
    pub preload: bool,
}

impl Default for PayloadConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("test_payload"),
            preload: false,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
