//! Control plane error types

use streamgate_sinks::SinkError;
use streamgate_transform::TransformError;
use thiserror::Error;

/// Errors raised fetching or applying manifests
#[derive(Debug, Error)]
pub enum ControlError {
    /// The manifest store could not be reached or answered with an error
    #[error("manifest store error: {0}")]
    Store(String),

    /// The manifest value was not valid JSON for the schema
    #[error("invalid manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    /// A processor rule failed to build; the whole manifest is rejected
    #[error("processor '{id}' failed to build: {source}")]
    ProcessorBuild {
        /// Rule id from the manifest
        id: String,
        /// Construction failure
        #[source]
        source: TransformError,
    },

    /// An output failed to build; the whole manifest is rejected
    #[error("output failed to build: {source}")]
    SinkBuild {
        /// Construction failure
        #[source]
        source: SinkError,
    },
}

impl From<redis::RedisError> for ControlError {
    fn from(e: redis::RedisError) -> Self {
        Self::Store(e.to_string())
    }
}
