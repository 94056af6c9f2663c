use std::cell::Cell;

use super::*;
use crate::IterSource;

/// Source that counts pulls and fails after `fail_after` units.
struct CountingSource<'a> {
    units: Vec<char>,
    next: usize,
    pulls: &'a Cell<usize>,
    fail_after: Option<usize>,
}

impl<'a> CountingSource<'a> {
    fn new(text: &str, pulls: &'a Cell<usize>) -> Self {
        Self {
            units: text.chars().collect(),
            next: 0,
            pulls,
            fail_after: None,
        }
    }
}

impl Source<char> for CountingSource<'_> {
    fn pull(&mut self) -> Result<Option<char>, SourceError> {
        self.pulls.set(self.pulls.get() + 1);
        if self.fail_after == Some(self.next) {
            return Err(SourceError::InvalidUtf8 { offset: self.next });
        }
        let unit = self.units.get(self.next).copied();
        self.next += 1;
        Ok(unit)
    }
}

// === FixedBuffer ===

#[test]
fn fixed_empty() {
    let mut buf: FixedBuffer<char> = FixedBuffer::from("");
    assert_eq!(buf.len(), 0);
    assert!(buf.is_empty());
    assert!(!buf.fill_to(0));
    assert!(buf.is_exhausted());
}

#[test]
fn fixed_fill_is_bounds_check() {
    let mut buf = FixedBuffer::from("abc");
    assert!(buf.fill_to(0));
    assert!(buf.fill_to(2));
    assert!(!buf.fill_to(3));
    assert_eq!(buf.as_slice(), ['a', 'b', 'c']);
}

#[test]
fn fixed_from_bytes() {
    let buf = FixedBuffer::from(&b"syntax = \"proto3\";"[..]);
    assert_eq!(buf.len(), 18);
    assert_eq!(buf.as_slice()[0], b's');
    assert!(buf.source_error().is_none());
}

// === StreamBuffer ===

#[test]
fn stream_starts_empty() {
    let pulls = Cell::new(0);
    let buf = StreamBuffer::new(CountingSource::new("abc", &pulls));
    assert_eq!(buf.len(), 0);
    assert!(!buf.is_exhausted());
    assert_eq!(pulls.get(), 0);
}

#[test]
fn stream_pulls_only_what_is_asked() {
    let pulls = Cell::new(0);
    let mut buf = StreamBuffer::new(CountingSource::new("abcdef", &pulls));
    assert!(buf.fill_to(1));
    assert_eq!(buf.len(), 2);
    assert_eq!(pulls.get(), 2);

    // Already held: no further pulls.
    assert!(buf.fill_to(0));
    assert_eq!(pulls.get(), 2);

    assert!(buf.fill_to(3));
    assert_eq!(buf.as_slice(), ['a', 'b', 'c', 'd']);
    assert_eq!(pulls.get(), 4);
}

#[test]
fn stream_exhausts_once() {
    let pulls = Cell::new(0);
    let mut buf = StreamBuffer::new(CountingSource::new("ab", &pulls));
    assert!(!buf.fill_to(5));
    assert!(buf.is_exhausted());
    assert_eq!(buf.len(), 2);
    assert_eq!(pulls.get(), 3);

    // The source is not asked again after reporting the end.
    assert!(!buf.fill_to(5));
    buf.fill_all();
    assert_eq!(pulls.get(), 3);
}

#[test]
fn stream_fill_all() {
    let mut buf = StreamBuffer::new(IterSource::new("lexing".chars()));
    buf.fill_all();
    assert!(buf.is_exhausted());
    assert_eq!(buf.as_slice().iter().collect::<String>(), "lexing");
}

#[test]
fn stream_keeps_first_error() {
    let pulls = Cell::new(0);
    let mut source = CountingSource::new("abcd", &pulls);
    source.fail_after = Some(2);
    let mut buf = StreamBuffer::with_capacity(source, 4);

    assert!(!buf.fill_to(3));
    assert!(buf.is_exhausted());
    assert_eq!(buf.as_slice(), ['a', 'b']);
    assert!(matches!(
        buf.source_error(),
        Some(SourceError::InvalidUtf8 { offset: 2 })
    ));

    // No retry after a failure.
    assert!(!buf.fill_to(3));
    assert_eq!(pulls.get(), 3);

    assert!(buf.take_source_error().is_some());
    assert!(buf.source_error().is_none());
}

#[test]
fn stream_zero_capacity_still_grows() {
    let mut buf = StreamBuffer::with_capacity(IterSource::new(0u8..100), 0);
    assert!(buf.fill_to(99));
    assert_eq!(buf.len(), 100);
}
