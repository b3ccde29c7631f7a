//! StreamGate - Pipeline
//!
//! The single-consumer worker that drains the ingest queue, runs records
//! through the active processor chain, batches survivors, and flushes
//! batches to the active sink.
//!
//! # Design
//!
//! - **One worker**: exactly one consumer drains the queue, which is what
//!   makes the delivery order the push order for surviving records
//! - **Hot swap without locks**: chain, sink, and batch size live in three
//!   independent atomic cells ([`PipelineState`]); the control plane
//!   publishes new values, the worker loads them per iteration. Each cell's
//!   transition is sharp; transitions across cells are not coordinated.
//! - **Two shedding stages**: the queue tail-drops on overflow, and above
//!   80% occupancy the worker bypasses the chain entirely, preferring
//!   drainage over processing
//! - **Lossy by contract**: chain errors and sink failures are logged and
//!   the records discarded; nothing is retried inside the pipeline

mod metrics;
mod state;
mod worker;

pub use metrics::{WorkerMetrics, WorkerMetricsSnapshot};
pub use state::{DEFAULT_BATCH_SIZE, PipelineHandle, PipelineState};
pub use worker::{PipelineWorker, WorkerConfig};
