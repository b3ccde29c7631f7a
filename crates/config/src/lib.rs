//! StreamGate - Config
//!
//! Static process configuration. Everything here has a working default;
//! the gateway starts with no config file at all. Live-tunable settings
//! (chain, sinks, batch size) come from the control plane manifest
//! instead, never from this file.
//!
//! # Example
//!
//! ```toml
//! [server]
//! stream_port = 8081
//! datagram_port = 8082
//!
//! [control]
//! address = "localhost:6379"
//! channel = "streamgate_updates"
//! value_key = "streamgate_config"
//!
//! [engine]
//! queue_capacity = 65536
//! batch_size = 100
//! flush_interval = "100ms"
//! bypass_threshold = 0.8
//! ```

mod error;

pub use error::ConfigError;

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Listener configuration
    pub server: ServerConfig,

    /// Control plane store configuration
    pub control: ControlConfig,

    /// Data plane tuning
    pub engine: EngineConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

/// Listener configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Stream (TCP) bind address
    pub stream_address: String,

    /// Stream (TCP) listen port
    pub stream_port: u16,

    /// Datagram (UDP) bind address
    pub datagram_address: String,

    /// Datagram (UDP) listen port
    pub datagram_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            stream_address: "0.0.0.0".into(),
            stream_port: 8081,
            datagram_address: "0.0.0.0".into(),
            datagram_port: 8082,
        }
    }
}

/// Control plane store configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Store address (host:port)
    pub address: String,

    /// Pub-sub channel carrying update signals
    pub channel: String,

    /// Value key holding the manifest JSON
    pub value_key: String,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            address: "localhost:6379".into(),
            channel: "streamgate_updates".into(),
            value_key: "streamgate_config".into(),
        }
    }
}

/// Data plane tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Ingest queue capacity; must be a power of two
    pub queue_capacity: usize,

    /// Initial batch size (the manifest can replace it at runtime)
    pub batch_size: usize,

    /// Partial-batch flush interval
    #[serde(with = "humantime_serde")]
    pub flush_interval: Duration,

    /// Queue occupancy fraction above which processing is bypassed
    pub bypass_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 65536,
            batch_size: 100,
            flush_interval: Duration::from_millis(100),
            bypass_threshold: 0.80,
        }
    }
}
