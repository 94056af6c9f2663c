//! Bidirectional cursor over a [`Buffer`].
//!
//! The cursor tracks two indices into the buffer:
//!
//! ```text
//!  units:  l e x i n g . d a t a .
//!                      ^     ^
//!                    start  pos
//! ```
//!
//! `start` marks the first unit of the item being built and `pos` the next
//! unit to read. `start <= pos <= len` holds after every operation: moving
//! `pos` below `start` drags `start` along.
//!
//! # End of Input
//!
//! Every read returns `Option<U>`. `None` means the index is out of range,
//! either because it is negative, because the input ended, or because the
//! source failed. An out-of-range request never moves either index, so a
//! grammar can keep calling `next()` at the end without corrupting state.
//!
//! # Streamed Input
//!
//! Reads past the units held trigger one-unit pulls through
//! [`Buffer::fill_to`]. [`tail`](Cursor::tail) and nothing else drains the
//! whole source.

use std::marker::PhantomData;

use crate::{Buffer, SourceError};

/// Navigation state over a buffer of units.
#[derive(Clone, Debug)]
pub struct Cursor<U, B> {
    buf: B,
    /// First unit of the pending item.
    start: usize,
    /// Next unit to read.
    pos: usize,
    _unit: PhantomData<fn() -> U>,
}

impl<U: Clone, B: Buffer<U>> Cursor<U, B> {
    /// Place a cursor at the beginning of `buf`.
    pub fn new(buf: B) -> Self {
        Self {
            buf,
            start: 0,
            pos: 0,
            _unit: PhantomData,
        }
    }

    /// Unit at `idx`, pulling it in if needed.
    #[inline]
    fn get(&mut self, idx: usize) -> Option<U> {
        if self.buf.fill_to(idx) {
            self.buf.as_slice().get(idx).cloned()
        } else {
            None
        }
    }

    /// Move `pos` to an index known to be in range.
    #[inline]
    fn move_to(&mut self, idx: usize) {
        self.pos = idx;
        if idx < self.start {
            self.start = idx;
        }
    }

    /// Absolute index `n` units away from `pos`.
    #[inline]
    fn relative(&self, n: isize) -> Option<usize> {
        self.pos.checked_add_signed(n)
    }

    // === Reading ===

    /// Return the unit at `pos` and advance past it.
    ///
    /// At the end of input `pos` stays where it is.
    #[allow(
        clippy::should_implement_trait,
        reason = "unit navigation, not iteration: the cursor also moves backward"
    )]
    pub fn next(&mut self) -> Option<U> {
        let unit = self.get(self.pos)?;
        self.pos += 1;
        Some(unit)
    }

    /// Step back one unit and return it.
    ///
    /// At position zero nothing moves.
    pub fn prev(&mut self) -> Option<U> {
        let idx = self.pos.checked_sub(1)?;
        let unit = self.get(idx)?;
        self.move_to(idx);
        Some(unit)
    }

    /// Unit at `pos`.
    #[inline]
    pub fn cur(&mut self) -> Option<U> {
        self.get(self.pos)
    }

    /// Unit one past `pos`.
    #[inline]
    pub fn peek(&mut self) -> Option<U> {
        self.get(self.pos + 1)
    }

    /// Jump to absolute index `idx`.
    pub fn idx(&mut self, idx: isize) -> Option<U> {
        let idx = usize::try_from(idx).ok()?;
        let unit = self.get(idx)?;
        self.move_to(idx);
        Some(unit)
    }

    /// Jump `n` units forward, or backward for a negative `n`.
    pub fn offset(&mut self, n: isize) -> Option<U> {
        let idx = self.relative(n)?;
        let unit = self.get(idx)?;
        self.move_to(idx);
        Some(unit)
    }

    /// Unit at absolute index `idx`, without moving.
    pub fn peek_idx(&mut self, idx: isize) -> Option<U> {
        let idx = usize::try_from(idx).ok()?;
        self.get(idx)
    }

    /// Unit `n` away from `pos`, without moving.
    pub fn peek_offset(&mut self, n: isize) -> Option<U> {
        let idx = self.relative(n)?;
        self.get(idx)
    }

    /// Reset both indices to zero and return the first unit.
    pub fn head(&mut self) -> Option<U> {
        self.start = 0;
        self.pos = 0;
        self.get(0)
    }

    /// Move both indices to the last unit and return it.
    ///
    /// On streamed input this pulls the whole remaining source first, since
    /// the end cannot be known any other way.
    pub fn tail(&mut self) -> Option<U> {
        self.buf.fill_all();
        let last = self.buf.len().checked_sub(1)?;
        self.start = last;
        self.pos = last;
        self.get(last)
    }

    /// Units in `[a, b)`, clamped to what the buffer holds.
    ///
    /// `a` is clamped into `0..=len` and `b` into `a..=len`, so an inverted
    /// range is empty rather than an error. Nothing is pulled.
    pub fn extract(&self, a: isize, b: isize) -> &[U] {
        let len = self.buf.len();
        let a = usize::try_from(a).unwrap_or(0).min(len);
        let b = usize::try_from(b).unwrap_or(0).clamp(a, len);
        &self.buf.as_slice()[a..b]
    }

    // === Positions ===

    /// Units between `start` and `pos`.
    #[inline]
    pub fn width(&self) -> usize {
        self.pos - self.start
    }

    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Units held by the buffer. For streamed input, only those pulled so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Drop the pending units: `start = pos`.
    #[inline]
    pub fn ignore(&mut self) {
        self.start = self.pos;
    }

    /// Rewind to the start of the pending units: `pos = start`.
    #[inline]
    pub fn backup(&mut self) {
        self.pos = self.start;
    }

    /// Returns `true` if no unit exists at `pos`.
    #[inline]
    pub fn is_eof(&mut self) -> bool {
        !self.buf.fill_to(self.pos)
    }

    // === Predicates ===

    /// Test the unit at `pos` without moving. `false` at end of input.
    pub fn check(&mut self, pred: impl FnOnce(&U) -> bool) -> bool {
        self.cur().is_some_and(|unit| pred(&unit))
    }

    /// Consume the unit at `pos` if `pred` holds.
    ///
    /// A rejected unit is given back. At end of input nothing was taken, so
    /// nothing is given back and `pos` stays put. Grammars that expect a
    /// failed accept at the end to step back one unit must call
    /// [`prev`](Self::prev) themselves.
    pub fn accept(&mut self, pred: impl FnOnce(&U) -> bool) -> bool {
        let Some(unit) = self.next() else {
            return false;
        };
        if pred(&unit) {
            true
        } else {
            self.prev();
            false
        }
    }

    /// Consume units while `pred` holds. Returns how many were consumed.
    ///
    /// A run that stops at end of input leaves `pos` at the end, after the
    /// last accepted unit, instead of one unit before it.
    pub fn accept_run(&mut self, mut pred: impl FnMut(&U) -> bool) -> usize {
        let mut count = 0;
        while self.accept(&mut pred) {
            count += 1;
        }
        count
    }

    // === Pending Units ===

    /// Units between `start` and `pos`.
    #[inline]
    pub fn pending(&self) -> &[U] {
        &self.buf.as_slice()[self.start..self.pos]
    }

    /// Copy out the pending units and move `start` up to `pos`.
    pub(crate) fn take_pending(&mut self) -> Vec<U> {
        let units = self.pending().to_vec();
        self.ignore();
        units
    }

    // === Buffer Access ===

    pub fn buffer(&self) -> &B {
        &self.buf
    }

    /// Failure that ended streamed input early, if any.
    pub fn source_error(&self) -> Option<&SourceError> {
        self.buf.source_error()
    }

    pub fn take_source_error(&mut self) -> Option<SourceError> {
        self.buf.take_source_error()
    }
}
