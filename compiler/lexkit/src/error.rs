//! Error types for the lexer driver and pull sources.
//!
//! End of input is not an error: navigation reports it as `None`.
//! The types here cover what is left, failures upstream of the buffer and
//! faults in the emission protocol.

use std::io;

use thiserror::Error;

/// Failure reported by a [`Source`](crate::Source) while pulling a unit.
///
/// The streamed buffer treats it as end of input for navigation purposes
/// and keeps the first one for inspection.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The underlying reader failed.
    #[error("source read failed: {0}")]
    Io(#[from] io::Error),
    /// The byte stream does not decode as UTF-8.
    #[error("invalid UTF-8 sequence at byte offset {offset}")]
    InvalidUtf8 {
        /// Byte offset of the first byte of the bad sequence.
        offset: usize,
    },
}

/// Fault in the emission protocol, surfaced by
/// [`Lexer::try_next_item`](crate::Lexer::try_next_item).
///
/// Token kinds are stored as their `Debug` rendering so the error type does
/// not carry the lexer's generic parameters.
#[derive(Clone, Debug, Error, PartialEq, Eq, Hash)]
pub enum LexError {
    /// A state function emitted more items in one step than the queue holds.
    #[error("emission queue overflow: `{kind}` emitted with all {capacity} slots taken")]
    QueueOverflow {
        /// Capacity of the queue that rejected the item.
        capacity: usize,
        /// Kind of the rejected item.
        kind: String,
    },
    /// An item was emitted after the lexer terminated.
    #[error("`{kind}` emitted after the lexer terminated")]
    QueueClosed {
        /// Kind of the rejected item.
        kind: String,
    },
}
