//! Emitted items and the token-kind contract.

use std::borrow::Cow;
use std::fmt;
use std::hash::Hash;

/// Token-kind parameter of a lexer.
///
/// Kinds are compared and hashed by downstream consumers (switches, lookup
/// tables), so they must be cheap value types. `EOF` designates the kind of
/// the terminal item returned once the state machine has stopped.
pub trait TokenKind: Copy + Eq + Hash + fmt::Debug {
    /// Kind carried by the terminal item.
    const EOF: Self;
}

/// A classified span of units.
///
/// `value` is a copy of the units between the cursor's `start` and `pos`
/// at the moment of emission, and `offset` is that `start`. Items hold no
/// reference back into the lexer and cannot be mutated once produced;
/// [`with_kind`](Self::with_kind) builds a reclassified copy instead.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Item<K, U> {
    kind: K,
    offset: usize,
    value: Vec<U>,
}

impl<K, U> Item<K, U> {
    /// Create an item of `kind` starting at unit `offset`.
    pub fn new(kind: K, offset: usize, value: Vec<U>) -> Self {
        Self {
            kind,
            offset,
            value,
        }
    }

    /// Token kind.
    #[inline]
    pub fn kind(&self) -> K
    where
        K: Copy,
    {
        self.kind
    }

    /// Index of the first unit of this item in the input.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Index one past the last unit of this item.
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.value.len()
    }

    /// The units of this item.
    #[inline]
    pub fn value(&self) -> &[U] {
        &self.value
    }

    /// Take ownership of the units.
    pub fn into_value(self) -> Vec<U> {
        self.value
    }

    /// Number of units in this item.
    #[inline]
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Returns `true` if the item spans no units.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Same span, different kind.
    #[must_use]
    pub fn with_kind(self, kind: K) -> Self {
        Self { kind, ..self }
    }
}

impl<K: TokenKind, U> Item<K, U> {
    /// The terminal item: kind [`TokenKind::EOF`], no units.
    pub fn eof(offset: usize) -> Self {
        Self::new(K::EOF, offset, Vec::new())
    }

    /// Returns `true` if this is a terminal item.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.kind == K::EOF
    }
}

impl<K> Item<K, char> {
    /// The units collected into a `String`.
    pub fn text(&self) -> String {
        self.value.iter().collect()
    }
}

impl<K> Item<K, u8> {
    /// The units as a byte slice.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.value
    }

    /// The units decoded as UTF-8, replacing malformed sequences.
    pub fn text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Tok {
        Eof,
        Word,
        Number,
    }

    impl TokenKind for Tok {
        const EOF: Self = Tok::Eof;
    }

    #[test]
    fn eof_item_is_empty() {
        let item: Item<Tok, char> = Item::eof(7);
        assert!(item.is_eof());
        assert!(item.is_empty());
        assert_eq!(item.offset(), 7);
        assert_eq!(item.end(), 7);
    }

    #[test]
    fn char_item_text() {
        let item = Item::new(Tok::Word, 3, "lex".chars().collect());
        assert_eq!(item.text(), "lex");
        assert_eq!(item.len(), 3);
        assert_eq!(item.end(), 6);
        assert!(!item.is_eof());
    }

    #[test]
    fn byte_item_text() {
        let item = Item::new(Tok::Word, 0, b"proto".to_vec());
        assert_eq!(item.as_bytes(), b"proto");
        assert_eq!(item.text_lossy(), "proto");
    }

    #[test]
    fn with_kind_keeps_span() {
        let item = Item::new(Tok::Word, 4, b"42".to_vec());
        let number = item.clone().with_kind(Tok::Number);
        assert_eq!(number.kind(), Tok::Number);
        assert_eq!(number.offset(), item.offset());
        assert_eq!(number.value(), item.value());
    }

    #[test]
    fn into_value_hands_over_units() {
        let item = Item::new(Tok::Word, 0, vec!['o', 'k']);
        assert_eq!(item.into_value(), ['o', 'k']);
    }
}
