//! Startup orchestration.
//!
//! Order: validate configuration, open the static payload, build the relay
//! client, bind the listener. Every failure is fatal to the process.

use tokio::net::TcpListener;

use crate::config::{validate_config, TesterConfig, ValidationError};
use crate::http::TesterServer;
use crate::payload::{PayloadError, StaticPayload};
use crate::relay::{RelayBuildError, RelayClient};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid configuration: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "))]
    Config(Vec<ValidationError>),
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error(transparent)]
    Relay(#[from] RelayBuildError),
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// A server ready to run on its bound listener.
pub struct Prepared {
    pub server: TesterServer,
    pub listener: TcpListener,
    pub payload_len: u64,
}

pub async fn prepare(config: &TesterConfig) -> Result<Prepared, StartupError> {
    validate_config(config).map_err(StartupError::Config)?;

    let payload = StaticPayload::open(&config.payload).await?;
    tracing::info!(
        path = %config.payload.path.display(),
        bytes = payload.len(),
        preloaded = payload.is_preloaded(),
        "Payload opened"
    );

    let relay = RelayClient::new(&config.relay)?;
    tracing::info!(
        timeout = ?relay.timeout(),
        scheme = %relay.scheme(),
        "Relay client configured"
    );

    // validate_config guarantees a port is present
    let address = config.listener.socket_address().unwrap_or_default();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    Ok(Prepared {
        payload_len: payload.len(),
        server: TesterServer::new(payload, relay),
        listener,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn missing_port_is_fatal() {
        let err = match prepare(&TesterConfig::default()).await {
            Err(e) => e,
            Ok(_) => panic!("startup should fail without a port"),
        };
        assert!(matches!(err, StartupError::Config(ref errors) if errors.as_slice() == [ValidationError::MissingPort]));
    }

    #[tokio::test]
    async fn missing_payload_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = TesterConfig::default();
        config.listener.port = Some(0);
        config.listener.bind_address = "127.0.0.1".into();
        config.payload.path = dir.path().join("absent");

        assert!(matches!(prepare(&config).await, Err(StartupError::Payload(_))));
    }

    #[tokio::test]
    async fn binds_when_everything_is_valid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[1u8; 37]).unwrap();

        let mut config = TesterConfig::default();
        config.listener.port = Some(0);
        config.listener.bind_address = "127.0.0.1".into();
        config.payload.path = file.path().to_path_buf();

        let prepared = match prepare(&config).await {
            Ok(p) => p,
            Err(e) => panic!("startup failed: {e}"),
        };
        assert_eq!(prepared.payload_len, 37);
        assert!(prepared.listener.local_addr().unwrap().port() > 0);
    }
}
