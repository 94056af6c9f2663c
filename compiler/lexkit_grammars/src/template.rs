//! Flat text templates.
//!
//! `string with {name} in it` lexes as
//!
//! ```text
//! Ident("string with ")  Templ("name")  Ident(" in it")
//! ```
//!
//! and renders as `string with >>name<< in it`. Braces do not nest here: the
//! first `}` closes the template. A `{` without a closing `}` lexes as an
//! `Error` item spanning the rest of the input, and rendering stops there.

use lexkit::{Buffer, Item, Lexer, Source, SourceError, Step};
use thiserror::Error;
use tracing::debug;

use crate::TextToken;

/// How an `Error` item renders.
pub const ERROR_MARKER: &str = ":ERR:";

/// Rendering failure.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A `{` was never closed.
    #[error("unterminated template opened at offset {offset}")]
    Unterminated {
        /// Offset of the opening `{`.
        offset: usize,
        /// Output up to and including the error marker.
        rendered: String,
    },
    /// The streamed input failed before it ended.
    #[error(transparent)]
    Source(#[from] SourceError),
}

// === Grammar ===

/// Text up to the next `{`.
pub fn lex_text<B: Buffer<char>>(l: &mut Lexer<TextToken, char, B>) -> Step<TextToken, char, B> {
    l.accept_run(|c| *c != '{');
    if l.width() > 0 {
        l.emit(TextToken::Ident);
    }
    if l.check(|c| *c == '{') {
        Step::Next(lex_template)
    } else {
        Step::Done
    }
}

/// From a `{` to its `}`.
pub fn lex_template<B: Buffer<char>>(
    l: &mut Lexer<TextToken, char, B>,
) -> Step<TextToken, char, B> {
    l.next();
    l.ignore();
    l.accept_run(|c| *c != '}');

    if !l.check(|c| *c == '}') {
        l.emit(TextToken::Error);
        return Step::Done;
    }
    if l.width() > 0 {
        l.emit(TextToken::Templ);
    }
    l.next();
    l.ignore();
    Step::Next(lex_text)
}

// === Rendering ===

/// Render a template held in memory.
pub fn render(input: &str) -> Result<String, TemplateError> {
    match Lexer::materialized(lex_text, input.chars().collect::<Vec<_>>()) {
        Some(lexer) => render_lexer(lexer),
        None => Ok(String::new()),
    }
}

/// Render a template pulled from `source`.
pub fn render_stream<S: Source<char>>(source: S) -> Result<String, TemplateError> {
    render_lexer(Lexer::streamed(lex_text, source))
}

fn render_lexer<B: Buffer<char>>(
    lexer: Lexer<TextToken, char, B>,
) -> Result<String, TemplateError> {
    let mut out = String::new();
    let mut items = lexer.into_items();

    for item in items.by_ref() {
        render_item(&item, &mut out);
        if item.kind() == TextToken::Error {
            // The error item starts right after its `{`.
            let offset = item.offset().saturating_sub(1);
            debug!(offset, "unterminated template");
            return Err(TemplateError::Unterminated {
                offset,
                rendered: out,
            });
        }
    }

    match items.into_inner().take_source_error() {
        Some(err) => Err(err.into()),
        None => Ok(out),
    }
}

/// Append the rendering of one item.
pub fn render_item(item: &Item<TextToken, char>, out: &mut String) {
    match item.kind() {
        TextToken::Ident => out.extend(item.value()),
        TextToken::Templ => {
            out.push_str(">>");
            out.extend(item.value());
            out.push_str("<<");
        }
        TextToken::Error => out.push_str(ERROR_MARKER),
        TextToken::Eof | TextToken::LBrace | TextToken::RBrace => {}
    }
}
