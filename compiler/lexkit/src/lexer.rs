//! The lexer driver.
//!
//! A [`Lexer`] owns a [`Cursor`], the active state function and the
//! emission queue. [`Lexer::next_item`] is a trampoline: it hands out a
//! queued item if there is one, and otherwise runs the active state
//! function once and looks again.
//!
//! ```text
//!            +----------------+  emit   +-------+  pop   +----------+
//! next_item ->  StateFn(lexer) ---------> queue ---------> consumer |
//!            +----------------+         +-------+        +----------+
//!                    |  Step::Next(f) / Step::Done
//!                    +-----------------------------> state
//! ```
//!
//! Everything runs inside the consumer's call. A state function that emits
//! more items than the queue holds does not block: the emission fails and
//! the lexer reports [`LexError::QueueOverflow`] once the items already
//! queued have been handed out.
//!
//! The lexer derefs to its cursor, so state functions call navigation
//! (`next`, `accept_run`, `ignore`, ...) directly on it.

use std::fmt;
use std::iter::FusedIterator;
use std::ops::{Deref, DerefMut};

use tracing::{debug, error, trace, warn};

use crate::{
    Buffer, Cursor, FixedBuffer, Item, ItemQueue, LexError, LexerConfig, QueueError, Source,
    StateFn, StreamBuffer, TokenKind,
};

/// State-function lexer over a buffer `B` of units `U`, emitting kinds `K`.
pub struct Lexer<K, U, B> {
    cursor: Cursor<U, B>,
    /// `None` once a state function returned [`Step::Done`](crate::Step::Done).
    state: Option<StateFn<K, U, B>>,
    queue: ItemQueue<K, U>,
    /// First emission failure, reported after the queue drains.
    fault: Option<LexError>,
    config: LexerConfig,
}

/// Lexer over fully materialized input.
pub type MaterializedLexer<K, U> = Lexer<K, U, FixedBuffer<U>>;

/// Lexer pulling its input from a [`Source`].
pub type StreamedLexer<K, U, S> = Lexer<K, U, StreamBuffer<U, S>>;

impl<K: TokenKind, U: Clone> Lexer<K, U, FixedBuffer<U>> {
    /// Lex `units` starting in state `init`.
    ///
    /// Returns `None` for empty input.
    pub fn materialized(
        init: StateFn<K, U, FixedBuffer<U>>,
        units: impl Into<Vec<U>>,
    ) -> Option<Self> {
        Self::materialized_with_config(init, units, LexerConfig::default())
    }

    /// [`materialized`](Self::materialized) with an explicit configuration.
    pub fn materialized_with_config(
        init: StateFn<K, U, FixedBuffer<U>>,
        units: impl Into<Vec<U>>,
        config: LexerConfig,
    ) -> Option<Self> {
        let units = units.into();
        if units.is_empty() {
            return None;
        }
        Some(Self::with_buffer(init, FixedBuffer::new(units), config))
    }
}

impl<K: TokenKind, U: Clone, S: Source<U>> Lexer<K, U, StreamBuffer<U, S>> {
    /// Lex units pulled from `source`, starting in state `init`.
    ///
    /// Units are pulled only as far as the grammar navigates. Calling
    /// [`tail`](Cursor::tail) from a state function pulls the whole source.
    pub fn streamed(init: StateFn<K, U, StreamBuffer<U, S>>, source: S) -> Self {
        Self::streamed_with_config(init, source, LexerConfig::default())
    }

    /// [`streamed`](Self::streamed) with an explicit configuration.
    pub fn streamed_with_config(
        init: StateFn<K, U, StreamBuffer<U, S>>,
        source: S,
        config: LexerConfig,
    ) -> Self {
        let buf = StreamBuffer::with_capacity(source, config.buffer_capacity);
        Self::with_buffer(init, buf, config)
    }
}

impl<K: TokenKind, U: Clone, B: Buffer<U>> Lexer<K, U, B> {
    /// Lex the units of any buffer, starting in state `init`.
    pub fn with_buffer(init: StateFn<K, U, B>, buf: B, config: LexerConfig) -> Self {
        Self {
            cursor: Cursor::new(buf),
            state: Some(init),
            queue: ItemQueue::with_capacity(config.effective_queue_capacity()),
            fault: None,
            config,
        }
    }

    /// Next item, or the terminal item once the grammar is done.
    ///
    /// A fault is logged and reported as the terminal item. Use
    /// [`try_next_item`](Self::try_next_item) to observe it.
    pub fn next_item(&mut self) -> Item<K, U> {
        match self.try_next_item() {
            Ok(item) => item,
            Err(err) => {
                error!(error = %err, pos = self.cursor.pos(), "lexer fault");
                Item::eof(self.cursor.pos())
            }
        }
    }

    /// Next item, the terminal item, or the fault that stopped the lexer.
    ///
    /// Items queued before a fault are handed out first. The fault itself is
    /// returned once, after which every call returns the terminal item.
    pub fn try_next_item(&mut self) -> Result<Item<K, U>, LexError> {
        loop {
            if let Some(item) = self.queue.pop() {
                return Ok(item);
            }
            if let Some(fault) = self.fault.take() {
                self.halt();
                return Err(fault);
            }
            let Some(state) = self.state else {
                self.halt();
                return Ok(Item::eof(self.cursor.pos()));
            };
            trace!(start = self.cursor.start(), pos = self.cursor.pos(), "step");
            self.state = state(self).state();
        }
    }

    /// Emit the pending units as an item of `kind`.
    ///
    /// A rejected emission is recorded and surfaced by
    /// [`try_next_item`](Self::try_next_item). Only the first one is kept.
    pub fn emit(&mut self, kind: K) {
        if let Err(err) = self.try_emit(kind) {
            warn!(error = %err, "emission rejected");
            if self.fault.is_none() {
                self.fault = Some(err);
            }
        }
    }

    /// Emit the pending units as an item of `kind`, or fail without
    /// touching the cursor.
    pub fn try_emit(&mut self, kind: K) -> Result<(), LexError> {
        self.queue
            .check_slot()
            .map_err(|err| emission_fault(err, kind))?;

        let offset = self.cursor.start();
        let value = self.cursor.take_pending();
        trace!(kind = ?kind, offset, len = value.len(), "emit");
        self.queue
            .push(Item::new(kind, offset, value))
            .map_err(|err| emission_fault(err, kind))
    }

    /// Returns `true` once every further call to
    /// [`next_item`](Self::next_item) would return the terminal item.
    pub fn is_done(&self) -> bool {
        self.state.is_none() && self.queue.is_empty() && self.fault.is_none()
    }

    pub fn config(&self) -> &LexerConfig {
        &self.config
    }

    /// Iterate over items until the terminal one.
    pub fn items(&mut self) -> Items<'_, K, U, B> {
        Items {
            lexer: self,
            finished: false,
        }
    }

    /// Owning form of [`items`](Self::items).
    pub fn into_items(self) -> IntoItems<K, U, B> {
        IntoItems {
            lexer: self,
            finished: false,
        }
    }

    fn halt(&mut self) {
        if !self.queue.is_closed() {
            debug!(pos = self.cursor.pos(), len = self.cursor.len(), "lexer terminated");
            self.queue.close();
        }
        self.state = None;
    }
}

fn emission_fault<K: fmt::Debug>(err: QueueError, kind: K) -> LexError {
    let kind = format!("{kind:?}");
    match err {
        QueueError::Full { capacity } => LexError::QueueOverflow { capacity, kind },
        QueueError::Closed => LexError::QueueClosed { kind },
    }
}

impl<K, U, B> Deref for Lexer<K, U, B> {
    type Target = Cursor<U, B>;

    fn deref(&self) -> &Self::Target {
        &self.cursor
    }
}

impl<K, U, B> DerefMut for Lexer<K, U, B> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.cursor
    }
}

impl<K: fmt::Debug, U: fmt::Debug, B: fmt::Debug> fmt::Debug for Lexer<K, U, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lexer")
            .field("cursor", &self.cursor)
            .field("active", &self.state.is_some())
            .field("queued", &self.queue.len())
            .field("fault", &self.fault)
            .field("config", &self.config)
            .finish()
    }
}

/// Borrowing iterator over a lexer's items. Stops at the terminal item.
pub struct Items<'a, K, U, B> {
    lexer: &'a mut Lexer<K, U, B>,
    finished: bool,
}

impl<K: TokenKind, U: Clone, B: Buffer<U>> Iterator for Items<'_, K, U, B> {
    type Item = Item<K, U>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let item = self.lexer.next_item();
        if item.is_eof() {
            self.finished = true;
            return None;
        }
        Some(item)
    }
}

impl<K: TokenKind, U: Clone, B: Buffer<U>> FusedIterator for Items<'_, K, U, B> {}

/// Owning iterator over a lexer's items. Stops at the terminal item.
pub struct IntoItems<K, U, B> {
    lexer: Lexer<K, U, B>,
    finished: bool,
}

impl<K, U, B> IntoItems<K, U, B> {
    /// Give the lexer back, e.g. to inspect a source error.
    pub fn into_inner(self) -> Lexer<K, U, B> {
        self.lexer
    }
}

impl<K: TokenKind, U: Clone, B: Buffer<U>> Iterator for IntoItems<K, U, B> {
    type Item = Item<K, U>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let item = self.lexer.next_item();
        if item.is_eof() {
            self.finished = true;
            return None;
        }
        Some(item)
    }
}

impl<K: TokenKind, U: Clone, B: Buffer<U>> FusedIterator for IntoItems<K, U, B> {}

#[cfg(test)]
mod tests;
