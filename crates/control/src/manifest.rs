//! Manifest schema
//!
//! The JSON document published to the store's value key. Only the first
//! pipeline is used; the rest are reserved for a future multi-pipeline
//! gateway.
//!
//! ```json
//! {
//!   "version": "7",
//!   "pipelines": [{
//!     "name": "default",
//!     "batch_size": 200,
//!     "processors": [
//!       {"id": "drop_debug", "type": "attribute_filter",
//!        "params": {"attribute": "log.level", "value": "debug"}}
//!     ],
//!     "outputs": [
//!       {"type": "http", "url": "https://collector/ingest",
//!        "headers": {"X-Api-Key": "..."}}
//!     ]
//!   }]
//! }
//! ```

use std::collections::HashMap;

use serde::Deserialize;
use streamgate_pipeline::DEFAULT_BATCH_SIZE;

use crate::ControlError;

#[cfg(test)]
#[path = "manifest_test.rs"]
mod tests;

/// Top-level manifest document
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    /// Opaque version string, echoed in logs
    #[serde(default)]
    pub version: String,

    /// Pipeline configurations; only the first is applied
    #[serde(default)]
    pub pipelines: Vec<PipelineManifest>,
}

impl Manifest {
    /// Parse a manifest from its JSON form
    pub fn parse(raw: &str) -> Result<Self, ControlError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// One pipeline's configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineManifest {
    /// Pipeline name, for logs
    #[serde(default)]
    pub name: String,

    /// Records per batch; zero or missing means the default
    #[serde(default)]
    pub batch_size: usize,

    /// Processor rules, applied in order
    #[serde(default)]
    pub processors: Vec<ProcessorRule>,

    /// Delivery targets; empty installs a single console sink
    #[serde(default)]
    pub outputs: Vec<OutputRule>,
}

impl PipelineManifest {
    /// The batch size to install, with the zero/missing fallback applied
    pub fn effective_batch_size(&self) -> usize {
        if self.batch_size == 0 {
            DEFAULT_BATCH_SIZE
        } else {
            self.batch_size
        }
    }
}

/// One processor rule
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessorRule {
    /// Instance id, used as the processor name
    #[serde(default)]
    pub id: String,

    /// Processor type: `filter`, `redact`, `attribute_filter`
    #[serde(rename = "type")]
    pub kind: String,

    /// Type-specific string parameters
    #[serde(default)]
    pub params: HashMap<String, String>,
}

/// One delivery target
#[derive(Debug, Clone, Deserialize)]
pub struct OutputRule {
    /// Output type: `console`, `http`
    #[serde(rename = "type")]
    pub kind: String,

    /// Target URL (`http` outputs only)
    #[serde(default)]
    pub url: String,

    /// Extra request headers (`http` outputs only)
    #[serde(default)]
    pub headers: HashMap<String, String>,
}
