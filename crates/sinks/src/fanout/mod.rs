//! Fan-out sink - concurrent delivery to multiple children
//!
//! Dispatches one batch to every child sink concurrently, waits for all
//! deliveries to complete, and reports the first failure in child order.
//! Partial failure is not retried here; the caller decides what a failed
//! batch means.
//!
//! This is also the uniform wrapper the pipeline stores in its hot-swap
//! sink cell: a single console or HTTP sink is wrapped with
//! [`FanoutSink::single`], so the cell always holds one concrete type.

use std::sync::Arc;

use bytes::Bytes;
use futures_util::future::join_all;

use crate::{Sink, SinkResult};

#[cfg(test)]
#[path = "fanout_test.rs"]
mod tests;

/// Delivers each batch to an ordered list of child sinks concurrently
pub struct FanoutSink {
    sinks: Vec<Arc<dyn Sink>>,
}

impl FanoutSink {
    /// Create a fan-out over the given children, in order
    pub fn new(sinks: Vec<Arc<dyn Sink>>) -> Self {
        Self { sinks }
    }

    /// Wrap a single sink
    pub fn single(sink: Arc<dyn Sink>) -> Self {
        Self { sinks: vec![sink] }
    }

    /// Number of child sinks
    #[inline]
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// True if there are no children (every batch is silently accepted)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Names of all children, in order
    pub fn names(&self) -> Vec<&str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }
}

#[async_trait::async_trait]
impl Sink for FanoutSink {
    async fn write_batch(&self, batch: &[Bytes]) -> SinkResult<()> {
        // Children borrow the same batch; the join is the completion
        // barrier. Results come back in child order, so the first error
        // found is the first child's error.
        let deliveries = self.sinks.iter().map(|sink| sink.write_batch(batch));
        let results = join_all(deliveries).await;

        for result in results {
            result?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "fanout"
    }
}

impl std::fmt::Debug for FanoutSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanoutSink")
            .field("sinks", &self.names())
            .finish()
    }
}
