//! Transform error types

use thiserror::Error;

/// Errors that can occur building or running processors
#[derive(Debug, Error)]
pub enum TransformError {
    /// Invalid processor configuration (bad regex, conflicting params, ...)
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Processor failed while handling a record
    #[error("processing failed in '{processor}': {message}")]
    Process {
        /// Processor instance name
        processor: String,
        /// What went wrong
        message: String,
    },
}

impl TransformError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a processing error
    pub fn process(processor: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Process {
            processor: processor.into(),
            message: msg.into(),
        }
    }
}
