use pretty_assertions::assert_eq;

use super::*;
use crate::{ByteSource, CharSource, IterSource, Step};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Tok {
    Eof,
    Ident,
    Period,
}

impl TokenKind for Tok {
    const EOF: Self = Tok::Eof;
}

// === Grammars ===

/// Splits on `.`: everything between periods is an identifier.
fn init_state<B: Buffer<char>>(l: &mut Lexer<Tok, char, B>) -> Step<Tok, char, B> {
    while let Some(unit) = l.next() {
        if unit == '.' {
            if l.width() > 1 {
                l.prev();
                l.emit(Tok::Ident);
                l.next();
            }
            return Step::Next(state_period);
        }
    }
    if l.width() > 0 {
        l.emit(Tok::Ident);
    }
    Step::Done
}

fn state_period<B: Buffer<char>>(l: &mut Lexer<Tok, char, B>) -> Step<Tok, char, B> {
    l.emit(Tok::Period);
    if l.is_eof() {
        Step::Done
    } else {
        Step::Next(init_state)
    }
}

/// Same split, written with the predicate helpers.
fn acceptance_state<B: Buffer<char>>(l: &mut Lexer<Tok, char, B>) -> Step<Tok, char, B> {
    l.accept_run(|c| *c != '.');
    if l.width() > 0 {
        l.emit(Tok::Ident);
    }
    if l.check(|c| *c == '.') {
        Step::Next(accept_period)
    } else {
        Step::Done
    }
}

fn accept_period<B: Buffer<char>>(l: &mut Lexer<Tok, char, B>) -> Step<Tok, char, B> {
    if l.accept(|c| *c == '.') {
        l.emit(Tok::Period);
    }
    if l.is_eof() {
        Step::Done
    } else {
        Step::Next(acceptance_state)
    }
}

/// Emits three one-unit items in a single step.
fn burst<B: Buffer<char>>(l: &mut Lexer<Tok, char, B>) -> Step<Tok, char, B> {
    for _ in 0..3 {
        l.next();
        l.emit(Tok::Ident);
    }
    Step::Next(rest)
}

fn rest<B: Buffer<char>>(l: &mut Lexer<Tok, char, B>) -> Step<Tok, char, B> {
    if l.accept_run(|_| true) > 0 {
        l.emit(Tok::Ident);
    }
    Step::Done
}

// === Helpers ===

fn chars(text: &str) -> Vec<char> {
    text.chars().collect()
}

/// Drain a lexer, including the terminal item.
fn drain<B: Buffer<char>>(lexer: &mut Lexer<Tok, char, B>) -> Vec<(Tok, usize, String)> {
    let mut out = Vec::new();
    loop {
        let item = lexer.next_item();
        let eof = item.is_eof();
        out.push((item.kind(), item.offset(), item.text()));
        if eof {
            return out;
        }
    }
}

fn lex_fixed(init: StateFn<Tok, char, FixedBuffer<char>>, text: &str) -> Vec<(Tok, usize, String)> {
    match Lexer::materialized(init, chars(text)) {
        Some(mut lexer) => drain(&mut lexer),
        None => Vec::new(),
    }
}

type CharStream = StreamBuffer<char, IterSource<std::vec::IntoIter<char>>>;

fn lex_streamed(init: StateFn<Tok, char, CharStream>, text: &str) -> Vec<(Tok, usize, String)> {
    let mut lexer = Lexer::streamed(init, IterSource::new(chars(text)));
    drain(&mut lexer)
}

fn tok(kind: Tok, offset: usize, text: &str) -> (Tok, usize, String) {
    (kind, offset, text.to_string())
}

// === Construction ===

#[test]
fn materialized_rejects_empty_input() {
    assert!(Lexer::materialized(init_state, Vec::<char>::new()).is_none());
}

#[test]
fn materialized_with_config_keeps_config() {
    let config = LexerConfig::with_queue_capacity(4);
    let lexer = Lexer::materialized_with_config(init_state, chars("a"), config);
    assert_eq!(lexer.map(|l| l.config().queue_capacity), Some(4));
}

#[test]
fn streamed_empty_source_is_eof() {
    let items = lex_streamed(init_state, "");
    assert_eq!(items, [tok(Tok::Eof, 0, "")]);
}

// === Trampoline ===

#[test]
fn lexes_periods_and_identifiers() {
    let items = lex_fixed(init_state, "lexing.data.");
    assert_eq!(
        items,
        [
            tok(Tok::Ident, 0, "lexing"),
            tok(Tok::Period, 6, "."),
            tok(Tok::Ident, 7, "data"),
            tok(Tok::Period, 11, "."),
            tok(Tok::Eof, 12, ""),
        ]
    );
    let joined: String = items.iter().map(|(_, _, text)| text.as_str()).collect();
    assert_eq!(joined, "lexing.data.");
}

#[test]
fn first_item_last_char() {
    let items = lex_fixed(init_state, "lexing data.");
    assert_eq!(items[0], tok(Tok::Ident, 0, "lexing data"));
}

#[test]
fn first_item_middle_char() {
    let items = lex_fixed(init_state, "lexing.data.");
    assert_eq!(items[0], tok(Tok::Ident, 0, "lexing"));
}

#[test]
fn first_item_first_char() {
    let items = lex_fixed(init_state, ".lexing data.");
    assert_eq!(items[0], tok(Tok::Period, 0, "."));
}

#[test]
fn acceptance_grammar_matches_manual_one() {
    let expected = lex_fixed(init_state, "lexing.data.");
    assert_eq!(lex_fixed(acceptance_state, "lexing.data."), expected);
}

#[test]
fn eof_repeats_after_termination() {
    let mut lexer = Lexer::streamed(init_state, IterSource::new(chars("a.")));
    assert_eq!(lexer.next_item().kind(), Tok::Ident);
    assert_eq!(lexer.next_item().kind(), Tok::Period);
    for _ in 0..3 {
        let item = lexer.next_item();
        assert!(item.is_eof());
        assert!(item.is_empty());
        assert_eq!(item.offset(), 2);
    }
    assert!(lexer.is_done());
}

#[test]
fn streamed_matches_materialized() {
    for text in ["lexing.data.", ".lexing data.", "a..b", "...", "no periods", "x"] {
        assert_eq!(lex_streamed(init_state, text), lex_fixed(init_state, text), "input {text:?}");
        assert_eq!(
            lex_streamed(acceptance_state, text),
            lex_fixed(acceptance_state, text),
            "input {text:?}"
        );
    }
}

// === Emission ===

#[test]
fn ignore_then_emit_is_empty() {
    let Some(mut lexer) = Lexer::materialized(init_state, chars("abc")) else {
        panic!("input is not empty");
    };
    lexer.next();
    lexer.ignore();
    assert_eq!((lexer.start(), lexer.pos()), (1, 1));
    lexer.emit(Tok::Ident);
    let item = lexer.next_item();
    assert_eq!(item.kind(), Tok::Ident);
    assert_eq!(item.offset(), 1);
    assert!(item.is_empty());
}

#[test]
fn emit_advances_start() {
    let Some(mut lexer) = Lexer::materialized(init_state, chars("abc")) else {
        panic!("input is not empty");
    };
    lexer.offset(2);
    assert_eq!(lexer.try_emit(Tok::Ident), Ok(()));
    assert_eq!((lexer.start(), lexer.pos(), lexer.width()), (2, 2, 0));
    assert_eq!(lexer.next_item().text(), "ab");
}

#[test]
fn emit_after_termination_is_rejected() {
    let mut lexer = Lexer::streamed(init_state, IterSource::new(chars("a")));
    while !lexer.next_item().is_eof() {}
    assert_eq!(
        lexer.try_emit(Tok::Ident),
        Err(LexError::QueueClosed {
            kind: "Ident".to_string()
        })
    );
}

// === Queue Overflow ===

#[test]
fn overflow_surfaces_after_queued_items() {
    let Some(mut lexer) = Lexer::materialized(burst, chars("abcd")) else {
        panic!("input is not empty");
    };
    assert_eq!(lexer.try_next_item().map(|item| item.text()), Ok("a".to_string()));
    assert_eq!(lexer.try_next_item().map(|item| item.text()), Ok("b".to_string()));
    assert_eq!(
        lexer.try_next_item(),
        Err(LexError::QueueOverflow {
            capacity: 2,
            kind: "Ident".to_string()
        })
    );
    let item = lexer.try_next_item().map(|item| (item.kind(), item.offset()));
    assert_eq!(item, Ok((Tok::Eof, 3)));
    assert!(lexer.is_done());
}

#[test]
fn overflow_through_next_item_ends_in_eof() {
    let Some(mut lexer) = Lexer::materialized(burst, chars("abcd")) else {
        panic!("input is not empty");
    };
    let kinds: Vec<Tok> = (0..4).map(|_| lexer.next_item().kind()).collect();
    assert_eq!(kinds, [Tok::Ident, Tok::Ident, Tok::Eof, Tok::Eof]);
}

#[test]
fn larger_queue_absorbs_burst() {
    let config = LexerConfig::with_queue_capacity(3);
    let Some(mut lexer) = Lexer::materialized_with_config(burst, chars("abcd"), config) else {
        panic!("input is not empty");
    };
    let texts: Vec<String> = lexer.items().map(|item| item.text()).collect();
    assert_eq!(texts, ["a", "b", "c", "d"]);
}

// === Iterators ===

#[test]
fn items_stop_at_terminal() {
    let Some(mut lexer) = Lexer::materialized(init_state, chars("a.b")) else {
        panic!("input is not empty");
    };
    let kinds: Vec<Tok> = lexer.items().map(|item| item.kind()).collect();
    assert_eq!(kinds, [Tok::Ident, Tok::Period, Tok::Ident]);
    assert_eq!(lexer.items().next(), None);
}

#[test]
fn into_items_returns_lexer() {
    let lexer = Lexer::streamed(init_state, IterSource::new(chars("a.b")));
    let mut items = lexer.into_items();
    assert_eq!(items.by_ref().count(), 3);
    assert_eq!(items.next(), None);
    assert!(items.into_inner().is_done());
}

// === Readers ===

#[test]
fn streamed_from_char_reader() {
    let lexer = Lexer::streamed(init_state, CharSource::new("\u{e9}t\u{e9}.".as_bytes()));
    let texts: Vec<String> = lexer.into_items().map(|item| item.text()).collect();
    assert_eq!(texts, ["\u{e9}t\u{e9}", "."]);
}

#[test]
fn streamed_reader_failure_ends_input() {
    let bytes = [b'o', b'k', 0xC3];
    let mut items = Lexer::streamed(init_state, CharSource::new(&bytes[..])).into_items();
    assert_eq!(items.next().map(|item| item.text()), Some("ok".to_string()));
    assert_eq!(items.next(), None);
    let lexer = items.into_inner();
    assert!(matches!(
        lexer.source_error(),
        Some(crate::SourceError::InvalidUtf8 { offset: 2 })
    ));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Byte {
    Eof,
    Zero,
    Other,
}

impl TokenKind for Byte {
    const EOF: Self = Byte::Eof;
}

fn zero_bytes<B: Buffer<u8>>(l: &mut Lexer<Byte, u8, B>) -> Step<Byte, u8, B> {
    match l.next() {
        Some(0) => l.emit(Byte::Zero),
        Some(_) => l.emit(Byte::Other),
        None => return Step::Done,
    }
    Step::Next(zero_bytes)
}

#[test]
fn zero_bytes_are_units() {
    let lexer = Lexer::streamed(zero_bytes, ByteSource::new(&[0u8, 7, 0][..]));
    let kinds: Vec<Byte> = lexer.into_items().map(|item| item.kind()).collect();
    assert_eq!(kinds, [Byte::Zero, Byte::Other, Byte::Zero]);
}

// === Property tests ===

#[allow(
    clippy::disallowed_types,
    reason = "proptest macros internally use Arc"
)]
mod proptest_lexer {
    use proptest::prelude::*;

    use super::{acceptance_state, init_state, lex_fixed, lex_streamed, Tok};

    proptest! {
        #[test]
        fn round_trip_is_lossless(text in "[a-z. ]{1,48}") {
            for items in [lex_fixed(init_state, &text), lex_streamed(acceptance_state, &text)] {
                let joined: String = items.iter().map(|(_, _, value)| value.as_str()).collect();
                prop_assert_eq!(&joined, &text);
            }
        }

        #[test]
        fn offsets_are_contiguous(text in "[a-z.]{1,48}") {
            let items = lex_fixed(init_state, &text);
            let mut expected = 0;
            for (kind, offset, value) in &items {
                prop_assert_eq!(*offset, expected);
                expected += value.chars().count();
                if *kind == Tok::Eof {
                    prop_assert_eq!(expected, text.chars().count());
                }
            }
        }

        #[test]
        fn variants_agree(text in "[a-c.]{0,32}") {
            prop_assert_eq!(lex_streamed(init_state, &text), lex_fixed(init_state, &text)
                .into_iter()
                .chain(text.is_empty().then(|| (Tok::Eof, 0, String::new())))
                .collect::<Vec<_>>());
        }
    }
}
