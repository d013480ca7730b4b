//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::TesterConfig;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Load configuration from a TOML file.
///
/// Validation is deferred until command-line overrides have been applied.
pub fn load_config(path: &Path) -> Result<TesterConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: TesterConfig = toml::from_str(&content)?;
    Ok(config)
}
