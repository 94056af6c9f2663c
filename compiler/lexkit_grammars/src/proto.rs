//! Protocol-buffer schema tokenizer.
//!
//! Works on bytes. The grammar splits the input into punctuation and
//! words; [`tokenize`] then classifies each word against a
//! [`ProtoKeywords`] table supplied by the caller:
//!
//! ```text
//! message User { string name = 1; }
//! Message Type LBrace Type Ident Equal Value Semicolon RBrace
//! ```
//!
//! The table is never modified. Types declared by `message` and `enum` are
//! collected per call and only affect that call's output.

use std::io::Read;

use lexkit::{Buffer, ByteSource, Item, Lexer, SourceError, Step, TokenKind};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

/// Proto schema token kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProtoToken {
    Eof,
    /// A byte that starts no token.
    Error,
    Ident,
    /// Scalar or declared type name.
    Type,
    /// Number or quoted literal.
    Value,
    Equal,
    DQuote,
    Semicolon,
    LBrace,
    RBrace,
    Syntax,
    Package,
    Message,
    Enum,
    Repeated,
}

impl TokenKind for ProtoToken {
    const EOF: Self = ProtoToken::Eof;
}

/// Keyword and scalar type tables.
#[derive(Clone, Debug)]
pub struct ProtoKeywords {
    keywords: FxHashMap<Vec<u8>, ProtoToken>,
    types: FxHashSet<Vec<u8>>,
}

impl ProtoKeywords {
    /// No keywords and no types.
    pub fn empty() -> Self {
        Self {
            keywords: FxHashMap::default(),
            types: FxHashSet::default(),
        }
    }

    /// Add a keyword.
    #[must_use]
    pub fn with_keyword(mut self, word: &str, kind: ProtoToken) -> Self {
        self.keywords.insert(word.as_bytes().to_vec(), kind);
        self
    }

    /// Add a type name.
    #[must_use]
    pub fn with_type(mut self, word: &str) -> Self {
        self.types.insert(word.as_bytes().to_vec());
        self
    }

    pub fn keyword(&self, word: &[u8]) -> Option<ProtoToken> {
        self.keywords.get(word).copied()
    }

    pub fn is_type(&self, word: &[u8]) -> bool {
        self.types.contains(word)
    }

    /// Kind of a word outside any declaration context.
    pub fn classify(&self, word: &[u8]) -> ProtoToken {
        if let Some(kind) = self.keyword(word) {
            kind
        } else if self.is_type(word) {
            ProtoToken::Type
        } else if !word.is_empty() && word.iter().all(u8::is_ascii_digit) {
            ProtoToken::Value
        } else {
            ProtoToken::Ident
        }
    }
}

impl Default for ProtoKeywords {
    /// The proto3 keywords and scalar types.
    fn default() -> Self {
        const KEYWORDS: [(&str, ProtoToken); 5] = [
            ("syntax", ProtoToken::Syntax),
            ("package", ProtoToken::Package),
            ("message", ProtoToken::Message),
            ("enum", ProtoToken::Enum),
            ("repeated", ProtoToken::Repeated),
        ];
        const SCALARS: [&str; 15] = [
            "bool", "uint32", "uint64", "sint32", "sint64", "int32", "int64", "fixed32",
            "fixed64", "sfixed32", "sfixed64", "double", "float", "string", "bytes",
        ];

        let keywords = KEYWORDS
            .iter()
            .fold(Self::empty(), |table, &(word, kind)| table.with_keyword(word, kind));
        SCALARS.iter().fold(keywords, |table, word| table.with_type(word))
    }
}

// === Grammar ===

/// Bytes allowed in a word: names, numbers and dotted package paths.
#[inline]
fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'.'
}

/// Top-level dispatch.
pub fn lex_proto<B: Buffer<u8>>(l: &mut Lexer<ProtoToken, u8, B>) -> Step<ProtoToken, u8, B> {
    let Some(byte) = l.next() else {
        return Step::Done;
    };
    match byte {
        b'=' => l.emit(ProtoToken::Equal),
        b'"' => l.emit(ProtoToken::DQuote),
        b';' => l.emit(ProtoToken::Semicolon),
        b'{' => l.emit(ProtoToken::LBrace),
        b'}' => l.emit(ProtoToken::RBrace),
        b' ' | b'\t' | b'\r' | b'\n' => {
            l.accept_run(u8::is_ascii_whitespace);
            l.ignore();
        }
        b'/' if l.check(|b| *b == b'/') => return Step::Next(lex_comment),
        b if is_word_byte(b) => return Step::Next(lex_word),
        _ => l.emit(ProtoToken::Error),
    }
    Step::Next(lex_proto)
}

fn lex_word<B: Buffer<u8>>(l: &mut Lexer<ProtoToken, u8, B>) -> Step<ProtoToken, u8, B> {
    l.accept_run(|b| is_word_byte(*b));
    l.emit(ProtoToken::Ident);
    Step::Next(lex_proto)
}

/// `//` up to the end of the line.
fn lex_comment<B: Buffer<u8>>(l: &mut Lexer<ProtoToken, u8, B>) -> Step<ProtoToken, u8, B> {
    l.accept_run(|b| *b != b'\n');
    l.ignore();
    Step::Next(lex_proto)
}

// === Classification ===

/// Tokenize a schema held in memory.
pub fn tokenize(input: &[u8], keywords: &ProtoKeywords) -> Vec<Item<ProtoToken, u8>> {
    match Lexer::materialized(lex_proto, input) {
        Some(lexer) => classify(lexer.into_items().collect(), keywords),
        None => Vec::new(),
    }
}

/// Tokenize a schema read from `reader`.
pub fn tokenize_reader<R: Read>(
    reader: R,
    keywords: &ProtoKeywords,
) -> Result<Vec<Item<ProtoToken, u8>>, SourceError> {
    let mut items = Lexer::streamed(lex_proto, ByteSource::new(reader)).into_items();
    let words: Vec<_> = items.by_ref().collect();
    if let Some(err) = items.into_inner().take_source_error() {
        return Err(err);
    }
    Ok(classify(words, keywords))
}

/// Reclassify the grammar's `Ident` words.
fn classify(
    items: Vec<Item<ProtoToken, u8>>,
    keywords: &ProtoKeywords,
) -> Vec<Item<ProtoToken, u8>> {
    let declared = declared_types(&items, keywords);
    debug!(items = items.len(), declared = declared.len(), "classifying proto words");

    let mut quoted = false;
    items
        .into_iter()
        .map(|item| match item.kind() {
            ProtoToken::DQuote => {
                quoted = !quoted;
                item
            }
            ProtoToken::Ident if quoted => item.with_kind(ProtoToken::Value),
            ProtoToken::Ident if declared.contains(item.value()) => {
                item.with_kind(ProtoToken::Type)
            }
            ProtoToken::Ident => {
                let kind = keywords.classify(item.value());
                item.with_kind(kind)
            }
            _ => item,
        })
        .collect()
}

/// Names following `message` or `enum`.
fn declared_types(
    items: &[Item<ProtoToken, u8>],
    keywords: &ProtoKeywords,
) -> FxHashSet<Vec<u8>> {
    items
        .windows(2)
        .filter(|pair| {
            pair[0].kind() == ProtoToken::Ident
                && pair[1].kind() == ProtoToken::Ident
                && matches!(
                    keywords.classify(pair[0].value()),
                    ProtoToken::Message | ProtoToken::Enum
                )
        })
        .map(|pair| pair[1].value().to_vec())
        .collect()
}
