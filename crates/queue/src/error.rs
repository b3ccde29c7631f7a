//! Queue error types

use thiserror::Error;

/// Errors returned by queue construction and operations
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// The queue is full; the item was dropped and counted
    #[error("queue is full")]
    Full,

    /// Capacity must be a nonzero power of two
    #[error("queue capacity must be a nonzero power of two, got {0}")]
    InvalidCapacity(usize),
}
