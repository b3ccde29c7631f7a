//! Sink error types

use thiserror::Error;

/// Errors that can occur delivering a batch
#[derive(Debug, Error)]
pub enum SinkError {
    /// HTTP delivery returned a non-success status
    #[error("http delivery failed with status {status}")]
    HttpStatus {
        /// Response status code
        status: u16,
    },

    /// HTTP request failed (connect, timeout, ...)
    #[error("http request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Writing to a local target failed
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),

    /// Sink configuration is invalid
    #[error("invalid sink configuration: {0}")]
    Config(String),

    /// Delivery was cancelled mid-flight by shutdown
    #[error("delivery cancelled")]
    Cancelled,
}

impl SinkError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
