//! Worker metrics

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for the pipeline worker
#[derive(Debug, Default)]
pub struct WorkerMetrics {
    /// Records accepted by the chain (or bypassed) and batched
    pub records_batched: AtomicU64,

    /// Records dropped by a processor verdict
    pub records_dropped: AtomicU64,

    /// Records discarded because a processor errored
    pub records_failed: AtomicU64,

    /// Records that skipped the chain in overload bypass
    pub records_bypassed: AtomicU64,

    /// Batches handed to the sink
    pub batches_flushed: AtomicU64,

    /// Batches the sink failed to deliver
    pub flush_errors: AtomicU64,
}

impl WorkerMetrics {
    /// Create new metrics instance
    pub const fn new() -> Self {
        Self {
            records_batched: AtomicU64::new(0),
            records_dropped: AtomicU64::new(0),
            records_failed: AtomicU64::new(0),
            records_bypassed: AtomicU64::new(0),
            batches_flushed: AtomicU64::new(0),
            flush_errors: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn record_batched(&self) {
        self.records_batched.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_dropped(&self) {
        self.records_dropped.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_failed(&self) {
        self.records_failed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_bypassed(&self) {
        self.records_bypassed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn batch_flushed(&self) {
        self.batches_flushed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn flush_error(&self) {
        self.flush_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time snapshot of all counters
    pub fn snapshot(&self) -> WorkerMetricsSnapshot {
        WorkerMetricsSnapshot {
            records_batched: self.records_batched.load(Ordering::Relaxed),
            records_dropped: self.records_dropped.load(Ordering::Relaxed),
            records_failed: self.records_failed.load(Ordering::Relaxed),
            records_bypassed: self.records_bypassed.load(Ordering::Relaxed),
            batches_flushed: self.batches_flushed.load(Ordering::Relaxed),
            flush_errors: self.flush_errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of worker metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerMetricsSnapshot {
    pub records_batched: u64,
    pub records_dropped: u64,
    pub records_failed: u64,
    pub records_bypassed: u64,
    pub batches_flushed: u64,
    pub flush_errors: u64,
}
