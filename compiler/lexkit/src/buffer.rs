//! Unit storage behind the cursor.
//!
//! Two implementations share the [`Buffer`] trait:
//!
//! - [`FixedBuffer`] owns the whole input up front. Every fill request is a
//!   bounds check.
//! - [`StreamBuffer`] starts empty and pulls from a [`Source`] one unit at
//!   a time, only as far as navigation asks. Pulled units are never
//!   dropped, so earlier offsets stay addressable for `extract` and
//!   backward movement.
//!
//! # Layout
//!
//! ```text
//! [pulled units ............][not yet pulled ...]
//!  ^                          ^
//!  0                          len()
//! ```
//!
//! A source failure ends the stream: the buffer reports itself exhausted,
//! keeps the first error, and the cursor sees end of input from there on.

use tracing::{debug, warn};

use crate::config::DEFAULT_BUFFER_CAPACITY;
use crate::{Source, SourceError};

/// Indexed storage the cursor navigates.
///
/// `fill_to` is the only way a buffer grows. Callers never read past
/// `len()` without asking for it first.
pub trait Buffer<U> {
    /// Number of units currently held.
    fn len(&self) -> usize;

    /// Returns `true` if no units are held.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make `idx` addressable if the input reaches that far.
    ///
    /// Returns `true` iff `idx < len()` afterwards.
    fn fill_to(&mut self, idx: usize) -> bool;

    /// Pull everything the input has left.
    fn fill_all(&mut self);

    /// All units held so far.
    fn as_slice(&self) -> &[U];

    /// Returns `true` once no further unit can ever be added.
    fn is_exhausted(&self) -> bool;

    /// The failure that ended the input, if it did not end cleanly.
    fn source_error(&self) -> Option<&SourceError> {
        None
    }

    /// Take the failure that ended the input, leaving `None` behind.
    fn take_source_error(&mut self) -> Option<SourceError> {
        None
    }
}

/// Fully materialized input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedBuffer<U> {
    units: Box<[U]>,
}

impl<U> FixedBuffer<U> {
    /// Take ownership of the input.
    pub fn new(units: impl Into<Vec<U>>) -> Self {
        Self {
            units: units.into().into_boxed_slice(),
        }
    }
}

impl<U> From<Vec<U>> for FixedBuffer<U> {
    fn from(units: Vec<U>) -> Self {
        Self::new(units)
    }
}

impl From<&str> for FixedBuffer<char> {
    fn from(text: &str) -> Self {
        Self::new(text.chars().collect::<Vec<_>>())
    }
}

impl From<&[u8]> for FixedBuffer<u8> {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

impl<U> Buffer<U> for FixedBuffer<U> {
    #[inline]
    fn len(&self) -> usize {
        self.units.len()
    }

    #[inline]
    fn fill_to(&mut self, idx: usize) -> bool {
        idx < self.units.len()
    }

    #[inline]
    fn fill_all(&mut self) {}

    #[inline]
    fn as_slice(&self) -> &[U] {
        &self.units
    }

    #[inline]
    fn is_exhausted(&self) -> bool {
        true
    }
}

/// Lazily pulled input.
#[derive(Debug)]
pub struct StreamBuffer<U, S> {
    /// Every unit pulled so far, in order.
    buf: Vec<U>,
    source: S,
    /// Set once the source returned `None` or failed.
    exhausted: bool,
    /// First failure reported by the source.
    error: Option<SourceError>,
}

impl<U, S: Source<U>> StreamBuffer<U, S> {
    /// Wrap `source` with the default reservation.
    pub fn new(source: S) -> Self {
        Self::with_capacity(source, DEFAULT_BUFFER_CAPACITY)
    }

    /// Wrap `source`, reserving room for `capacity` units.
    pub fn with_capacity(source: S, capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            source,
            exhausted: false,
            error: None,
        }
    }

    /// Pull a single unit. Returns `false` if the source is done.
    fn pull_one(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        match self.source.pull() {
            Ok(Some(unit)) => {
                self.buf.push(unit);
                true
            }
            Ok(None) => {
                debug!(pulled = self.buf.len(), "source exhausted");
                self.exhausted = true;
                false
            }
            Err(err) => {
                warn!(pulled = self.buf.len(), error = %err, "source failed");
                self.exhausted = true;
                self.error = Some(err);
                false
            }
        }
    }
}

impl<U, S: Source<U>> Buffer<U> for StreamBuffer<U, S> {
    #[inline]
    fn len(&self) -> usize {
        self.buf.len()
    }

    fn fill_to(&mut self, idx: usize) -> bool {
        while self.buf.len() <= idx {
            if !self.pull_one() {
                return false;
            }
        }
        true
    }

    fn fill_all(&mut self) {
        while self.pull_one() {}
    }

    #[inline]
    fn as_slice(&self) -> &[U] {
        &self.buf
    }

    #[inline]
    fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    fn source_error(&self) -> Option<&SourceError> {
        self.error.as_ref()
    }

    fn take_source_error(&mut self) -> Option<SourceError> {
        self.error.take()
    }
}

#[cfg(test)]
mod tests;
