//! State functions.
//!
//! A grammar is a graph of plain functions. Each one runs against the
//! lexer, may move the cursor and emit items, and returns the [`Step`] to
//! take next. Grammars are usually written generic over the buffer so the
//! same functions drive both materialized and streamed input:
//!
//! ```text
//! fn lex_text<B: Buffer<char>>(l: &mut Lexer<Tok, char, B>) -> Step<Tok, char, B> {
//!     l.accept_run(|c| *c != '{');
//!     l.emit(Tok::Text);
//!     Step::Next(lex_brace)
//! }
//! ```

use std::fmt;

use crate::Lexer;

/// A transition of the lexer's state machine.
pub type StateFn<K, U, B> = fn(&mut Lexer<K, U, B>) -> Step<K, U, B>;

/// What the lexer does after a state function returns.
pub enum Step<K, U, B> {
    /// Run this state function on the next pull.
    Next(StateFn<K, U, B>),
    /// Stop. The lexer is terminal from here on.
    Done,
}

impl<K, U, B> Step<K, U, B> {
    /// Returns `true` for [`Step::Done`].
    #[inline]
    pub fn is_done(&self) -> bool {
        matches!(self, Step::Done)
    }

    /// The next state function, if any.
    #[inline]
    pub fn state(self) -> Option<StateFn<K, U, B>> {
        match self {
            Step::Next(state) => Some(state),
            Step::Done => None,
        }
    }
}

impl<K, U, B> Clone for Step<K, U, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, U, B> Copy for Step<K, U, B> {}

impl<K, U, B> fmt::Debug for Step<K, U, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Next(_) => f.write_str("Next(..)"),
            Step::Done => f.write_str("Done"),
        }
    }
}
