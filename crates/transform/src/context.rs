//! Processing context - per-iteration state handed to processors

use tokio_util::sync::CancellationToken;

/// Context threaded through every processor invocation.
///
/// Carries cancellation as a first-class signal so long chains can bail out
/// during shutdown instead of smuggling flags through shared state.
#[derive(Debug, Clone)]
pub struct ProcessContext {
    cancel: CancellationToken,
}

impl ProcessContext {
    /// Create a context bound to the given cancellation token
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    /// True once shutdown has been requested
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// The underlying cancellation token
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }
}

impl Default for ProcessContext {
    fn default() -> Self {
        Self::new(CancellationToken::new())
    }
}
