//! Fixed-capacity emission queue.
//!
//! Sits between a state function calling `emit` and the consumer calling
//! `next_item`. Both run on the same thread inside the same call, so the
//! queue never waits for space: a push into a full queue fails with
//! [`QueueError::Full`] and the caller decides what to do with it.

use smallvec::SmallVec;
use thiserror::Error;

use crate::config::DEFAULT_QUEUE_CAPACITY;
use crate::Item;

/// Rejected push.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash)]
pub enum QueueError {
    /// All slots are taken.
    #[error("queue is full (capacity {capacity})")]
    Full {
        /// Capacity of the queue.
        capacity: usize,
    },
    /// The queue was closed after the lexer terminated.
    #[error("queue is closed")]
    Closed,
}

/// FIFO of emitted items with a hard capacity.
///
/// Storage is inline for the default capacity and spills to the heap only
/// when a larger capacity is configured.
#[derive(Clone, Debug)]
pub struct ItemQueue<K, U> {
    items: SmallVec<[Item<K, U>; DEFAULT_QUEUE_CAPACITY]>,
    capacity: usize,
    closed: bool,
}

impl<K, U> ItemQueue<K, U> {
    /// Create an empty queue. A zero capacity is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: SmallVec::with_capacity(capacity),
            capacity,
            closed: false,
        }
    }

    /// Fails the way [`push`](Self::push) would, without an item in hand.
    pub fn check_slot(&self) -> Result<(), QueueError> {
        if self.closed {
            return Err(QueueError::Closed);
        }
        if self.is_full() {
            return Err(QueueError::Full {
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Append an item at the back.
    pub fn push(&mut self, item: Item<K, U>) -> Result<(), QueueError> {
        self.check_slot()?;
        self.items.push(item);
        Ok(())
    }

    /// Remove the item at the front.
    ///
    /// Items queued before [`close`](Self::close) can still be popped.
    pub fn pop(&mut self) -> Option<Item<K, U>> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.items.remove(0))
        }
    }

    /// Reject all further pushes.
    pub fn close(&mut self) {
        self.closed = true;
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Free slots left.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity - self.items.len()
    }
}

impl<K, U> Default for ItemQueue<K, U> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }
}
