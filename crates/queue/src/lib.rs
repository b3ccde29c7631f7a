//! StreamGate - Queue
//!
//! Bounded single-producer/single-consumer ring queue for the ingest path.
//!
//! # Design
//!
//! - **Fixed capacity**: power-of-two slot count, mask-based indexing,
//!   branch-free wrap-around
//! - **Tail-drop**: a push against a full queue fails immediately and is
//!   counted; the producer never blocks
//! - **Lock-free hot path**: one atomic load and one atomic store per
//!   operation, no locks
//! - **Ownership transfer**: items move producer → queue → consumer; the
//!   queue never retains an item after `pop`
//!
//! The single-producer/single-consumer contract is enforced by the type
//! system: [`Producer`] and [`Consumer`] are not `Clone`, and both `push`
//! and `pop` take `&mut self`. Ingest paths with many connection tasks
//! funnel through [`SharedProducer`], which serializes pushes behind a
//! mutex while keeping the queue itself SPSC.
//!
//! # Example
//!
//! ```ignore
//! let (mut tx, mut rx) = streamgate_queue::bounded::<Bytes>(1024)?;
//!
//! tx.push(record)?;               // Err(QueueError::Full) sheds the record
//! while let Some(record) = rx.pop() {
//!     // ...
//! }
//! ```

mod error;
mod ring;

pub use error::QueueError;
pub use ring::{Consumer, Producer, SharedProducer, bounded};
