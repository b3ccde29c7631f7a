//! Console sink - verbatim stdout output
//!
//! Writes every record in the batch to standard output exactly as it
//! arrived. Records framed from a stream source usually still carry their
//! newline terminator; datagram records may not, so no separator is added
//! here. Debug-grade: not intended for high-throughput production use.

use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;

use crate::{Sink, SinkResult};

#[cfg(test)]
#[path = "console_test.rs"]
mod tests;

/// Writes each record verbatim to standard output
pub struct ConsoleSink {
    name: String,
    metrics: ConsoleSinkMetrics,
}

/// Metrics for the console sink
#[derive(Debug, Default)]
pub struct ConsoleSinkMetrics {
    batches_written: AtomicU64,
    records_written: AtomicU64,
    bytes_written: AtomicU64,
}

impl ConsoleSinkMetrics {
    /// Point-in-time snapshot
    pub fn snapshot(&self) -> ConsoleMetricsSnapshot {
        ConsoleMetricsSnapshot {
            batches_written: self.batches_written.load(Ordering::Relaxed),
            records_written: self.records_written.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of console sink metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsoleMetricsSnapshot {
    pub batches_written: u64,
    pub records_written: u64,
    pub bytes_written: u64,
}

impl ConsoleSink {
    /// Create a console sink with the default name
    pub fn new() -> Self {
        Self::with_name("console")
    }

    /// Create a console sink with a custom name
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metrics: ConsoleSinkMetrics::default(),
        }
    }

    /// Get sink metrics
    pub fn metrics(&self) -> &ConsoleSinkMetrics {
        &self.metrics
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Sink for ConsoleSink {
    async fn write_batch(&self, batch: &[Bytes]) -> SinkResult<()> {
        let stdout = std::io::stdout();
        let mut out = std::io::BufWriter::new(stdout.lock());

        let mut bytes = 0u64;
        for record in batch {
            out.write_all(record)?;
            bytes += record.len() as u64;
        }
        out.flush()?;

        self.metrics.batches_written.fetch_add(1, Ordering::Relaxed);
        self.metrics
            .records_written
            .fetch_add(batch.len() as u64, Ordering::Relaxed);
        self.metrics.bytes_written.fetch_add(bytes, Ordering::Relaxed);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleSink")
            .field("name", &self.name)
            .finish()
    }
}
