//! Processor chain - sequential per-record execution
//!
//! # Design
//!
//! - **Sequential**: processors run in declared order, each receiving the
//!   output of the previous
//! - **Short-circuit**: the first drop or error stops the chain; later
//!   processors never observe the record
//! - **Immutable**: a chain is built once; "changing" a chain means
//!   publishing a new one into the pipeline's chain cell

use bytes::Bytes;

use crate::{Disposition, ProcessContext, Processor, TransformResult};

#[cfg(test)]
#[path = "chain_test.rs"]
mod tests;

/// Ordered sequence of processors applied to one record at a time
pub struct ProcessorChain {
    processors: Vec<Box<dyn Processor>>,
}

impl ProcessorChain {
    /// Create a chain from the given processors, applied in order
    pub fn new(processors: Vec<Box<dyn Processor>>) -> Self {
        Self { processors }
    }

    /// Create an empty chain (every record passes through unchanged)
    pub fn empty() -> Self {
        Self {
            processors: Vec::new(),
        }
    }

    /// Number of processors in the chain
    #[inline]
    pub fn len(&self) -> usize {
        self.processors.len()
    }

    /// True if the chain has no processors
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Names of all processors, in order
    pub fn names(&self) -> Vec<&str> {
        self.processors.iter().map(|p| p.name()).collect()
    }

    /// Run a record through every processor in sequence.
    ///
    /// # Fast path
    ///
    /// An empty chain returns the record unchanged with no overhead beyond
    /// the iteration check.
    ///
    /// # Short-circuit
    ///
    /// A processor returning [`Disposition::Drop`] or an error stops the
    /// chain immediately; the record is not delivered in either case.
    pub fn process(&self, ctx: &ProcessContext, record: Bytes) -> TransformResult<Disposition> {
        let mut current = record;

        for processor in &self.processors {
            match processor.process(ctx, current)? {
                Disposition::Keep(next) => current = next,
                Disposition::Drop => return Ok(Disposition::Drop),
            }
        }

        Ok(Disposition::Keep(current))
    }
}

impl Default for ProcessorChain {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for ProcessorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessorChain")
            .field("processors", &self.names())
            .finish()
    }
}
