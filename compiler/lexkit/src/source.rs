//! Pull sources for the streamed buffer.
//!
//! A [`Source`] hands out one unit per call. The streamed buffer calls it
//! only when navigation reaches past the units it already holds, so a
//! grammar that never looks far ahead never reads far ahead.

use std::io::{self, BufReader, Read};

use crate::SourceError;

/// Single-unit pull interface.
///
/// `Ok(Some(unit))` is exactly one unit, `Ok(None)` means no more data.
/// Once a source has returned `Ok(None)` or an error, the streamed buffer
/// stops calling it.
pub trait Source<U> {
    /// Pull the next unit.
    fn pull(&mut self) -> Result<Option<U>, SourceError>;
}

impl<U, S: Source<U> + ?Sized> Source<U> for &mut S {
    #[inline]
    fn pull(&mut self) -> Result<Option<U>, SourceError> {
        (**self).pull()
    }
}

impl<U, S: Source<U> + ?Sized> Source<U> for Box<S> {
    #[inline]
    fn pull(&mut self) -> Result<Option<U>, SourceError> {
        (**self).pull()
    }
}

/// Source over any iterator. Never fails.
#[derive(Clone, Debug)]
pub struct IterSource<I> {
    iter: I,
}

impl<I: Iterator> IterSource<I> {
    pub fn new<T: IntoIterator<IntoIter = I>>(units: T) -> Self {
        Self {
            iter: units.into_iter(),
        }
    }
}

impl<I: Iterator> Source<I::Item> for IterSource<I> {
    #[inline]
    fn pull(&mut self) -> Result<Option<I::Item>, SourceError> {
        Ok(self.iter.next())
    }
}

/// Bytes of a reader, one at a time.
///
/// The reader is wrapped in a [`BufReader`], so single-byte pulls do not
/// turn into single-byte reads on the underlying handle.
#[derive(Debug)]
pub struct ByteSource<R> {
    reader: BufReader<R>,
    offset: usize,
}

impl<R: Read> ByteSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            offset: 0,
        }
    }

    /// Number of bytes pulled so far.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<R: Read> Source<u8> for ByteSource<R> {
    fn pull(&mut self) -> Result<Option<u8>, SourceError> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.offset += 1;
                    return Ok(Some(byte[0]));
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }
}

/// UTF-8 decoded `char`s of a reader.
///
/// A malformed or truncated sequence fails with
/// [`SourceError::InvalidUtf8`] carrying the byte offset where it starts.
#[derive(Debug)]
pub struct CharSource<R> {
    bytes: ByteSource<R>,
}

impl<R: Read> CharSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            bytes: ByteSource::new(reader),
        }
    }

    /// Number of bytes consumed so far.
    #[inline]
    pub fn byte_offset(&self) -> usize {
        self.bytes.offset()
    }
}

impl<R: Read> Source<char> for CharSource<R> {
    fn pull(&mut self) -> Result<Option<char>, SourceError> {
        let offset = self.bytes.offset();
        let Some(lead) = self.bytes.pull()? else {
            return Ok(None);
        };
        let invalid = || SourceError::InvalidUtf8 { offset };
        let Some(len) = utf8_sequence_length(lead) else {
            return Err(invalid());
        };

        let mut seq = [lead, 0, 0, 0];
        for slot in seq.iter_mut().take(len).skip(1) {
            match self.bytes.pull()? {
                Some(byte) => *slot = byte,
                None => return Err(invalid()),
            }
        }

        match std::str::from_utf8(&seq[..len]) {
            Ok(decoded) => Ok(decoded.chars().next()),
            Err(_) => Err(invalid()),
        }
    }
}

/// Length of the UTF-8 sequence introduced by `lead`, or `None` for a byte
/// that cannot start one.
fn utf8_sequence_length(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC0..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF7 => Some(4),
        _ => None,
    }
}
