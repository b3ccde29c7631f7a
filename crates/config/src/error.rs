//! Configuration error types

use thiserror::Error;

/// Errors loading the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for the schema
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
