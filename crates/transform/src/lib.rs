//! StreamGate - Transform
//!
//! Processor chain for per-record filtering and redaction in-flight.
//!
//! # Overview
//!
//! Processors inspect or rewrite one record at a time as it moves from the
//! ingest queue to the sink. They can:
//! - Drop records (substring filter, attribute filter)
//! - Rewrite records (redaction)
//! - Pass records through untouched
//!
//! # Design Principles
//!
//! - **Fast**: processors run on the single consumer's hot path and must
//!   complete in microseconds
//! - **Non-blocking**: never touch I/O or external services
//! - **Immutable once built**: a chain is constructed once and replaced
//!   atomically, never mutated
//! - **Fail-open**: ambiguous input (non-JSON, missing attribute) passes
//!   through rather than being dropped
//!
//! # Architecture
//!
//! ```text
//! [Record] → [Processor 1] → [Processor 2] → ... → keep | drop | error
//! ```
//!
//! The [`ProcessorChain`] handles sequencing: a processor returning
//! [`Disposition::Drop`] or an error stops the chain immediately.
//!
//! # Adding a New Processor
//!
//! 1. Implement [`Processor`] on your struct; validate everything at
//!    construction so `process` stays infallible where possible.
//! 2. Implement [`ProcessorFactory`] to build it from manifest params.
//! 3. Register the factory in [`default_registry`].

mod chain;
mod context;
mod error;
pub mod attribute;
pub mod filter;
pub mod redact;
pub mod registry;

pub use attribute::{AttributeFilterConfig, AttributeFilterProcessor, Comparison};
pub use chain::ProcessorChain;
pub use context::ProcessContext;
pub use error::TransformError;
pub use filter::FilterProcessor;
pub use redact::RedactProcessor;
pub use registry::{
    ProcessorFactory, ProcessorParams, ProcessorRegistry, default_registry,
};

use bytes::Bytes;

/// Result type for transform operations
pub type TransformResult<T> = Result<T, TransformError>;

/// Outcome of running one record through a processor or a chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Keep the record (possibly replaced) and continue
    Keep(Bytes),

    /// Discard the record; later processors never observe it
    Drop,
}

impl Disposition {
    /// True if the record was dropped
    #[inline]
    pub fn is_drop(&self) -> bool {
        matches!(self, Disposition::Drop)
    }
}

/// Trait for per-record processors
///
/// Implementors must be `Send + Sync`: the active chain is shared with the
/// pipeline worker through an atomic cell and may outlive the configuration
/// that produced it.
///
/// # Design
///
/// Processors are stateless or internally immutable. All validation
/// (regex compilation, parameter checks) happens at construction; the
/// `process` path only evaluates.
pub trait Processor: Send + Sync {
    /// Run one record through this processor.
    ///
    /// Returns the record (possibly replaced) with a keep/drop verdict, or
    /// an error. An error aborts the chain and the worker discards the
    /// record; it never aborts the worker itself.
    fn process(&self, ctx: &ProcessContext, record: Bytes) -> TransformResult<Disposition>;

    /// Name of this processor instance for logging
    fn name(&self) -> &str;
}
