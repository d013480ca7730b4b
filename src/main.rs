//! HTTP payload relay tester.
//!
//! ```text
//!   caller ──GET /check/{route}──▶ initiator ──POST /listen──▶ receiver
//!          ◀── {status, error, bytes} ──┘    ◀──── 200 / 500 ─────┘
//! ```
//!
//! `X-Payload-Tracer` from the caller is forwarded on the relay request and
//! echoed on every response.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use payload_tester::config::{load_config, TesterConfig, Scheme};
use payload_tester::lifecycle::{self, Shutdown};
use payload_tester::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "payload-tester")]
#[command(about = "Test your HTTP requests across a routing mesh", long_about = None)]
struct Cli {
    /// Optional TOML configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Time to wait for response to check calls [default: 5s]
    #[arg(short, long, value_parser = humantime::parse_duration)]
    timeout: Option<Duration>,

    /// Use https in outbound URL instead of http
    #[arg(short = 's', long)]
    https_out: bool,

    /// Target payload file [default: test_payload]
    #[arg(short, long)]
    payload: Option<PathBuf>,

    /// Load the payload into memory at startup
    #[arg(long)]
    preload: bool,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Log level when RUST_LOG is not set
    #[arg(long)]
    log_level: Option<String>,

    /// Serve Prometheus metrics on this address
    #[arg(long)]
    metrics_address: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<TesterConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => TesterConfig::default(),
        };

        if let Some(timeout) = self.timeout {
            config.relay.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        }
        if self.https_out {
            config.relay.scheme = Scheme::Https;
        }
        if let Some(path) = self.payload {
            config.payload.path = path;
        }
        config.payload.preload |= self.preload;
        if self.port.is_some() {
            config.listener.port = self.port;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        if let Some(address) = self.metrics_address {
            config.observability.metrics_enabled = true;
            config.observability.metrics_address = address;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init(&config.observability.log_level);
    tracing::info!("payload-tester v{} starting", env!("CARGO_PKG_VERSION"));

    let prepared = match lifecycle::prepare(&config).await {
        Ok(prepared) => prepared,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return Err(e.into());
        }
    };

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    tracing::info!(
        address = %prepared.listener.local_addr()?,
        payload_bytes = prepared.payload_len,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();
    prepared.server.run(prepared.listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
