//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeout > 0, port present)
//! - Validate addresses before anything binds to them
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: TesterConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use crate::config::schema::TesterConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please set PORT environment variable with port for server to listen on")]
    MissingPort,
    #[error("relay timeout must be greater than zero")]
    ZeroTimeout,
    #[error("payload path must not be empty")]
    EmptyPayloadPath,
    #[error("invalid listen address {0:?}")]
    InvalidBindAddress(String),
    #[error("invalid metrics address {0:?}")]
    InvalidMetricsAddress(String),
}

pub fn validate_config(config: &TesterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match config.listener.socket_address() {
        None => errors.push(ValidationError::MissingPort),
        Some(addr) => {
            if addr.parse::<SocketAddr>().is_err() {
                errors.push(ValidationError::InvalidBindAddress(addr));
            }
        }
    }

    if config.relay.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.payload.path.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyPayloadPath);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
