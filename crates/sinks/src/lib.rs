//! StreamGate - Sinks
//!
//! Batch delivery targets for the pipeline worker.
//!
//! # Overview
//!
//! A sink receives one batch of records and either delivers all of them or
//! reports a single error. Nothing here retries: the system is explicitly
//! lossy under failure, and retry policy belongs to the collectors upstream
//! or downstream of the gateway.
//!
//! # Sinks
//!
//! - `console` - writes records verbatim to stdout
//! - `http` - POSTs newline-joined batches with a per-request timeout
//! - `fanout` - delivers one batch to N child sinks concurrently
//!
//! The pipeline always holds a [`FanoutSink`] as its active sink so the
//! hot-swap cell stores a single concrete type; a lone console or HTTP sink
//! is wrapped via [`FanoutSink::single`].

pub mod console;
pub mod fanout;
pub mod http;

mod error;

pub use console::ConsoleSink;
pub use error::SinkError;
pub use fanout::FanoutSink;
pub use http::{HttpSink, HttpSinkConfig};

use bytes::Bytes;

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Trait for batch delivery targets
///
/// Implementors must be `Send + Sync`: the active sink is shared with the
/// pipeline worker through an atomic cell and fan-out delivers to children
/// concurrently.
#[async_trait::async_trait]
pub trait Sink: Send + Sync {
    /// Deliver one batch.
    ///
    /// The batch is borrowed for the duration of the call and must not be
    /// mutated. Returns the first error encountered; partial delivery is
    /// not distinguished.
    async fn write_batch(&self, batch: &[Bytes]) -> SinkResult<()>;

    /// Name of this sink for logging
    fn name(&self) -> &str;
}
