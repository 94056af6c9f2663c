//! Nested bracket templates.
//!
//! Unlike [`template`](crate::template), braces nest here, so the lexer
//! only marks them and leaves the pairing to [`tree::build`]:
//!
//! ```text
//! a {b {c} d} e
//! Ident("a ") LBrace Ident("b ") LBrace Ident("c") RBrace Ident(" d") RBrace Ident(" e")
//! ```
//!
//! Rendering wraps every closed scope in `>>` and `<<`, which gives
//! `a >>b >>c<< d<< e`.

pub mod tree;

use lexkit::{Buffer, Lexer, Source, SourceError, Step};
use thiserror::Error;

use crate::TextToken;

/// Failure to pair or render brackets.
#[derive(Debug, Error)]
pub enum BracketError {
    /// A `{` has no matching `}`.
    #[error("unterminated bracket scope opened at offset {offset}")]
    Unterminated {
        /// Offset of the unmatched `{`.
        offset: usize,
        /// Top-level output rendered before the failing scope.
        rendered: String,
    },
    /// A `}` has no matching `{`.
    #[error("unbalanced closing bracket at offset {offset}")]
    Unbalanced {
        /// Offset of the stray `}`.
        offset: usize,
    },
    /// The streamed input failed before it ended.
    #[error(transparent)]
    Source(#[from] SourceError),
}

// === Grammar ===

/// Dispatch on the unit at the cursor.
pub fn lex_brackets<B: Buffer<char>>(
    l: &mut Lexer<TextToken, char, B>,
) -> Step<TextToken, char, B> {
    match l.cur() {
        None => Step::Done,
        Some('{' | '}') => Step::Next(lex_brace),
        Some(_) => Step::Next(lex_text),
    }
}

/// A run of text without braces.
fn lex_text<B: Buffer<char>>(l: &mut Lexer<TextToken, char, B>) -> Step<TextToken, char, B> {
    l.accept_run(|c| !is_brace(*c));
    l.emit(TextToken::Ident);
    Step::Next(lex_brackets)
}

/// A single brace.
fn lex_brace<B: Buffer<char>>(l: &mut Lexer<TextToken, char, B>) -> Step<TextToken, char, B> {
    if l.accept(|c| *c == '{') {
        l.emit(TextToken::LBrace);
    } else if l.accept(|c| *c == '}') {
        l.emit(TextToken::RBrace);
    }
    Step::Next(lex_brackets)
}

#[inline]
fn is_brace(c: char) -> bool {
    c == '{' || c == '}'
}

// === Rendering ===

/// Pair and render brackets in a string held in memory.
pub fn render(input: &str) -> Result<String, BracketError> {
    let Some(lexer) = Lexer::materialized(lex_brackets, input.chars().collect::<Vec<_>>()) else {
        return Ok(String::new());
    };
    tree::build(lexer.into_items())?.render()
}

/// Pair and render brackets pulled from `source`.
pub fn render_stream<S: Source<char>>(source: S) -> Result<String, BracketError> {
    let mut items = Lexer::streamed(lex_brackets, source).into_items();
    let tree = tree::build(items.by_ref())?;
    if let Some(err) = items.into_inner().take_source_error() {
        return Err(err.into());
    }
    tree.render()
}
