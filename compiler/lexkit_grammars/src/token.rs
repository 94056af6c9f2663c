//! Token kinds shared by the text grammars.

use lexkit::TokenKind;

/// Kinds emitted by the [`template`](crate::template) and
/// [`brackets`](crate::brackets) grammars.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextToken {
    Eof,
    /// Malformed input. The item spans what was read before giving up.
    Error,
    /// Plain text.
    Ident,
    /// Content of a `{...}` template, braces excluded.
    Templ,
    LBrace,
    RBrace,
}

impl TokenKind for TextToken {
    const EOF: Self = TextToken::Eof;
}
