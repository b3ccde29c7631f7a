//! Pipeline worker - pop, process, batch, flush
//!
//! The worker is the system's single consumer. Each iteration, in priority
//! order: honor cancellation (flush once, terminate), honor the flush
//! timer, then pop one record. Popped records go through the active chain
//! unless the queue is running hot, in which case they bypass processing so
//! the queue drains faster.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use streamgate_queue::Consumer;
use streamgate_sinks::{FanoutSink, Sink};
use streamgate_transform::{Disposition, ProcessContext, ProcessorChain};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::metrics::WorkerMetrics;
use crate::state::{PipelineHandle, PipelineState};

#[cfg(test)]
#[path = "worker_test.rs"]
mod tests;

/// How long the worker sleeps when the queue is observed empty.
///
/// A placeholder for a wake-up primitive poked by the producer; the
/// contract is only bounded idle CPU and sub-flush-interval latency under
/// steady load.
const IDLE_SLEEP: Duration = Duration::from_millis(1);

/// Worker configuration
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Initial batch size (replaceable at runtime)
    pub batch_size: usize,

    /// Periodic flush interval for partial batches
    pub flush_interval: Duration,

    /// Queue occupancy fraction above which the chain is bypassed
    pub bypass_threshold: f64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            batch_size: crate::DEFAULT_BATCH_SIZE,
            flush_interval: Duration::from_millis(100),
            bypass_threshold: 0.80,
        }
    }
}

/// The single consumer draining the ingest queue
pub struct PipelineWorker {
    consumer: Consumer<Bytes>,
    state: Arc<PipelineState>,
    flush_interval: Duration,
    bypass_threshold: f64,
    metrics: Arc<WorkerMetrics>,
}

impl PipelineWorker {
    /// Create the worker and the handle used to reconfigure it.
    ///
    /// The worker starts with the given chain and sink installed; the
    /// control adapter replaces them through the returned
    /// [`PipelineHandle`].
    pub fn new(
        consumer: Consumer<Bytes>,
        chain: ProcessorChain,
        sink: FanoutSink,
        config: WorkerConfig,
    ) -> (Self, PipelineHandle) {
        let state = Arc::new(PipelineState::new(chain, sink, config.batch_size));
        let worker = Self {
            consumer,
            state: Arc::clone(&state),
            flush_interval: config.flush_interval,
            bypass_threshold: config.bypass_threshold,
            metrics: Arc::new(WorkerMetrics::new()),
        };
        (worker, PipelineHandle::new(state))
    }

    /// Get a metrics handle that stays valid after `run()` consumes the
    /// worker
    pub fn metrics(&self) -> Arc<WorkerMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run the worker until cancellation.
    ///
    /// On cancellation the in-flight batch is flushed once before the
    /// worker terminates.
    pub async fn run(mut self, cancel: CancellationToken) {
        info!(
            queue_capacity = self.consumer.capacity(),
            batch_size = self.state.batch_size(),
            flush_interval_ms = self.flush_interval.as_millis() as u64,
            "pipeline worker starting"
        );

        let mut batch: Vec<Bytes> = Vec::with_capacity(self.state.batch_size());
        let ctx = ProcessContext::new(cancel.clone());
        let mut next_flush = Instant::now() + self.flush_interval;

        loop {
            // Priority 1: shutdown. Flush once and terminate.
            if cancel.is_cancelled() {
                self.flush(&mut batch).await;
                break;
            }

            // Priority 2: the periodic flush timer.
            if Instant::now() >= next_flush {
                self.flush(&mut batch).await;
                next_flush = Instant::now() + self.flush_interval;
            }

            // Priority 3: drain the queue.
            let Some(record) = self.consumer.pop() else {
                // Empty queue: doze briefly, waking early for shutdown so
                // the final flush is not delayed.
                tokio::select! {
                    _ = cancel.cancelled() => {}
                    _ = tokio::time::sleep(IDLE_SLEEP) => {}
                }
                continue;
            };

            self.handle_record(&ctx, record, &mut batch).await;
        }

        let snapshot = self.metrics.snapshot();
        info!(
            records_batched = snapshot.records_batched,
            records_dropped = snapshot.records_dropped,
            records_failed = snapshot.records_failed,
            records_bypassed = snapshot.records_bypassed,
            batches_flushed = snapshot.batches_flushed,
            flush_errors = snapshot.flush_errors,
            queue_dropped = self.consumer.dropped(),
            "pipeline worker stopped"
        );
    }

    /// True while queue occupancy is above the bypass threshold
    fn overloaded(&self) -> bool {
        let usage = self.consumer.usage() as f64;
        let capacity = self.consumer.capacity() as f64;
        usage > capacity * self.bypass_threshold
    }

    async fn handle_record(&mut self, ctx: &ProcessContext, record: Bytes, batch: &mut Vec<Bytes>) {
        if self.overloaded() {
            // Bypass mode: delivery beats processing while the queue is
            // draining. Records land in the batch unprocessed.
            self.metrics.record_bypassed();
            batch.push(record);
        } else {
            let chain = self.state.chain();
            match chain.process(ctx, record) {
                Ok(Disposition::Keep(record)) => {
                    self.metrics.record_batched();
                    batch.push(record);
                }
                Ok(Disposition::Drop) => {
                    self.metrics.record_dropped();
                    return;
                }
                Err(e) => {
                    warn!(error = %e, "processor chain failed, record discarded");
                    self.metrics.record_failed();
                    return;
                }
            }
        }

        if batch.len() >= self.state.batch_size() {
            self.flush(batch).await;
        }
    }

    /// Hand the batch to the active sink and reset it, keeping capacity
    async fn flush(&mut self, batch: &mut Vec<Bytes>) {
        if batch.is_empty() {
            return;
        }

        let sink = self.state.sink();
        match sink.write_batch(batch).await {
            Ok(()) => {
                self.metrics.batch_flushed();
                debug!(records = batch.len(), "batch flushed");
            }
            Err(e) => {
                self.metrics.flush_error();
                warn!(error = %e, records = batch.len(), "batch delivery failed, discarded");
            }
        }
        batch.clear();
    }
}

impl std::fmt::Debug for PipelineWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineWorker")
            .field("queue_capacity", &self.consumer.capacity())
            .field("batch_size", &self.state.batch_size())
            .finish()
    }
}
