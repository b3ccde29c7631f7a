//! Ingest adapter error types

use thiserror::Error;

/// Errors raised by ingest adapters
#[derive(Debug, Error)]
pub enum IngestError {
    /// Listener could not be bound; fatal at startup
    #[error("failed to bind {address}: {source}")]
    Bind {
        /// Address that could not be bound
        address: String,
        /// Underlying socket error
        #[source]
        source: std::io::Error,
    },

    /// Socket I/O failed
    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),
}
