//! SPSC ring queue - lock-free bounded queue with tail-drop
//!
//! Head and tail are monotonically increasing u64 counters; the slot index
//! is `counter & mask`. The producer owns `head`, the consumer owns `tail`,
//! and each publishes its counter with release after touching the slot so
//! the other side's acquire load observes the slot contents.

use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_utils::CachePadded;
use parking_lot::Mutex;

use crate::QueueError;

#[cfg(test)]
#[path = "ring_test.rs"]
mod tests;

/// Create a bounded SPSC queue with the given capacity.
///
/// Capacity must be a nonzero power of two so wrap-around is a mask.
///
/// # Errors
///
/// Returns [`QueueError::InvalidCapacity`] for zero or non-power-of-two
/// capacities.
pub fn bounded<T>(capacity: usize) -> Result<(Producer<T>, Consumer<T>), QueueError> {
    if capacity == 0 || !capacity.is_power_of_two() {
        return Err(QueueError::InvalidCapacity(capacity));
    }

    let mut slots = Vec::with_capacity(capacity);
    slots.resize_with(capacity, || UnsafeCell::new(MaybeUninit::uninit()));

    let shared = Arc::new(Shared {
        slots: slots.into_boxed_slice(),
        mask: capacity as u64 - 1,
        capacity: capacity as u64,
        head: CachePadded::new(AtomicU64::new(0)),
        tail: CachePadded::new(AtomicU64::new(0)),
        dropped: AtomicU64::new(0),
    });

    let producer = Producer {
        shared: Arc::clone(&shared),
    };
    let consumer = Consumer { shared };

    Ok((producer, consumer))
}

/// State shared between the producer and consumer handles
struct Shared<T> {
    /// Slot array; slot `i & mask` is written by the producer and read by
    /// the consumer, never both at once (guarded by the head/tail protocol)
    slots: Box<[UnsafeCell<MaybeUninit<T>>]>,

    /// `capacity - 1`, for mask-based indexing
    mask: u64,

    /// Total slot count
    capacity: u64,

    /// Producer write counter; padded to its own cache line
    head: CachePadded<AtomicU64>,

    /// Consumer read counter; padded to its own cache line
    tail: CachePadded<AtomicU64>,

    /// Number of pushes rejected because the queue was full
    dropped: AtomicU64,
}

// SAFETY: slot access is coordinated through the head/tail protocol; a slot
// is only touched by the producer before publishing head and by the consumer
// before publishing tail, never concurrently.
unsafe impl<T: Send> Send for Shared<T> {}
unsafe impl<T: Send> Sync for Shared<T> {}

impl<T> Shared<T> {
    #[inline]
    fn slot(&self, counter: u64) -> *mut MaybeUninit<T> {
        self.slots[(counter & self.mask) as usize].get()
    }

    /// Items currently queued. Sampled from both counters, so the value may
    /// transiently overshoot by one during a concurrent push or pop.
    fn usage(&self) -> u64 {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        head.saturating_sub(tail)
    }
}

impl<T> Drop for Shared<T> {
    fn drop(&mut self) {
        // Exclusive access here: drain whatever was pushed but never popped.
        let head = self.head.load(Ordering::Relaxed);
        let mut tail = self.tail.load(Ordering::Relaxed);
        while tail < head {
            unsafe { (*self.slot(tail)).assume_init_drop() };
            tail += 1;
        }
    }
}

/// Producing half of the queue.
///
/// Not `Clone`: there is exactly one producer. Use
/// [`Producer::into_shared`] when multiple tasks need to push.
pub struct Producer<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Producer<T> {
    /// Push an item, transferring ownership into the queue.
    ///
    /// Tail-drop on overflow: a full queue rejects the new item, increments
    /// the drop counter, and returns [`QueueError::Full`]. The producer
    /// never blocks.
    pub fn push(&mut self, item: T) -> Result<(), QueueError> {
        let head = self.shared.head.load(Ordering::Relaxed);
        let tail = self.shared.tail.load(Ordering::Acquire);

        if head - tail >= self.shared.capacity {
            self.shared.dropped.fetch_add(1, Ordering::Relaxed);
            return Err(QueueError::Full);
        }

        unsafe { (*self.shared.slot(head)).write(item) };
        self.shared.head.store(head + 1, Ordering::Release);
        Ok(())
    }

    /// Items currently queued
    #[inline]
    pub fn usage(&self) -> u64 {
        self.shared.usage()
    }

    /// Total slot count
    #[inline]
    pub fn capacity(&self) -> u64 {
        self.shared.capacity
    }

    /// Monotonic count of pushes rejected because the queue was full
    #[inline]
    pub fn dropped(&self) -> u64 {
        self.shared.dropped.load(Ordering::Relaxed)
    }

    /// Convert into a clonable handle that serializes pushes behind a mutex.
    ///
    /// The queue itself stays SPSC; fan-in from many ingest tasks happens
    /// above it.
    pub fn into_shared(self) -> SharedProducer<T> {
        SharedProducer {
            inner: Arc::new(Mutex::new(self)),
        }
    }
}

impl<T> std::fmt::Debug for Producer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Producer")
            .field("usage", &self.usage())
            .field("capacity", &self.capacity())
            .field("dropped", &self.dropped())
            .finish()
    }
}

/// Consuming half of the queue.
///
/// Not `Clone`: there is exactly one consumer.
pub struct Consumer<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Consumer<T> {
    /// Pop the oldest item, transferring ownership out of the queue.
    ///
    /// Non-blocking; returns `None` when the queue is observed empty.
    pub fn pop(&mut self) -> Option<T> {
        let tail = self.shared.tail.load(Ordering::Relaxed);
        let head = self.shared.head.load(Ordering::Acquire);

        if tail == head {
            return None;
        }

        let item = unsafe { (*self.shared.slot(tail)).assume_init_read() };
        self.shared.tail.store(tail + 1, Ordering::Release);
        Some(item)
    }

    /// Items currently queued
    #[inline]
    pub fn usage(&self) -> u64 {
        self.shared.usage()
    }

    /// Total slot count
    #[inline]
    pub fn capacity(&self) -> u64 {
        self.shared.capacity
    }

    /// Monotonic count of pushes rejected because the queue was full
    #[inline]
    pub fn dropped(&self) -> u64 {
        self.shared.dropped.load(Ordering::Relaxed)
    }
}

impl<T> std::fmt::Debug for Consumer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Consumer")
            .field("usage", &self.usage())
            .field("capacity", &self.capacity())
            .finish()
    }
}

/// Clonable producer handle for fan-in from multiple tasks.
///
/// Pushes are serialized through a mutex so the queue's single-producer
/// contract holds. The lock is held only for the duration of one push.
pub struct SharedProducer<T> {
    inner: Arc<Mutex<Producer<T>>>,
}

impl<T> Clone for SharedProducer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> SharedProducer<T> {
    /// Push an item. See [`Producer::push`].
    pub fn push(&self, item: T) -> Result<(), QueueError> {
        self.inner.lock().push(item)
    }

    /// Items currently queued
    pub fn usage(&self) -> u64 {
        self.inner.lock().usage()
    }

    /// Total slot count
    pub fn capacity(&self) -> u64 {
        self.inner.lock().capacity()
    }

    /// Monotonic count of pushes rejected because the queue was full
    pub fn dropped(&self) -> u64 {
        self.inner.lock().dropped()
    }
}

impl<T> std::fmt::Debug for SharedProducer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedProducer").finish_non_exhaustive()
    }
}
