//! Pipeline configuration cells - lock-free hot swap
//!
//! Three independently replaceable cells hold the active processor chain,
//! the active sink, and the active batch size. Writers publish a new
//! immutable value with release; the worker loads with acquire once per
//! use. Old chains and sinks drain naturally via their `Arc` refcount once
//! the last in-flight load completes.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use arc_swap::ArcSwap;
use streamgate_sinks::FanoutSink;
use streamgate_transform::ProcessorChain;

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;

/// Batch size installed when a manifest omits or zeroes it
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// The three hot-swappable configuration cells
pub struct PipelineState {
    /// Active processor chain
    chain: ArcSwap<ProcessorChain>,

    /// Active sink; always a fan-out so the cell holds one concrete type
    sink: ArcSwap<FanoutSink>,

    /// Active batch size
    batch_size: AtomicUsize,
}

impl PipelineState {
    pub(crate) fn new(chain: ProcessorChain, sink: FanoutSink, batch_size: usize) -> Self {
        Self {
            chain: ArcSwap::from_pointee(chain),
            sink: ArcSwap::from_pointee(sink),
            batch_size: AtomicUsize::new(effective_batch_size(batch_size)),
        }
    }

    /// Load the active chain
    #[inline]
    pub fn chain(&self) -> Arc<ProcessorChain> {
        self.chain.load_full()
    }

    /// Load the active sink
    #[inline]
    pub fn sink(&self) -> Arc<FanoutSink> {
        self.sink.load_full()
    }

    /// Load the active batch size
    #[inline]
    pub fn batch_size(&self) -> usize {
        self.batch_size.load(Ordering::Acquire)
    }
}

/// Clonable handle for publishing configuration updates.
///
/// Held by the control adapter; every update is visible to the worker on
/// its next iteration.
#[derive(Clone)]
pub struct PipelineHandle {
    state: Arc<PipelineState>,
}

impl PipelineHandle {
    pub(crate) fn new(state: Arc<PipelineState>) -> Self {
        Self { state }
    }

    /// Atomically replace the active processor chain
    pub fn update_chain(&self, chain: ProcessorChain) {
        tracing::info!(processors = ?chain.names(), "processor chain hot-swapped");
        self.state.chain.store(Arc::new(chain));
    }

    /// Atomically replace the active sink
    pub fn update_sink(&self, sink: FanoutSink) {
        tracing::info!(sinks = ?sink.names(), "sink hot-swapped");
        self.state.sink.store(Arc::new(sink));
    }

    /// Atomically replace the active batch size.
    ///
    /// Zero falls back to [`DEFAULT_BATCH_SIZE`]. Takes effect on
    /// subsequent append/flush decisions; the in-flight batch is never
    /// resized retroactively.
    pub fn update_batch_size(&self, size: usize) {
        let size = effective_batch_size(size);
        tracing::info!(batch_size = size, "batch size updated");
        self.state.batch_size.store(size, Ordering::Release);
    }

    /// Load the active chain
    pub fn chain(&self) -> Arc<ProcessorChain> {
        self.state.chain()
    }

    /// Load the active sink
    pub fn sink(&self) -> Arc<FanoutSink> {
        self.state.sink()
    }

    /// Load the active batch size
    pub fn batch_size(&self) -> usize {
        self.state.batch_size()
    }
}

impl std::fmt::Debug for PipelineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineHandle")
            .field("chain", &self.chain().names())
            .field("sink", &self.sink().names())
            .field("batch_size", &self.batch_size())
            .finish()
    }
}

fn effective_batch_size(size: usize) -> usize {
    if size == 0 { DEFAULT_BATCH_SIZE } else { size }
}
