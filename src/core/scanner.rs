//! Byte scanner over a `BufRead` source
//!
//! Works directly on the source's own buffer through `fill_buf`/`consume`,
//! so bytes the tokenizer has not asked for are never taken out of the
//! stream. A `<` that ends a text run is left unconsumed for the next scan
//! step; that is the only look-ahead the tokenizer needs.
//!
//! Bulk runs (text content, entity names) are located with memchr:
//! - SSE2 (default x86_64)
//! - AVX2 (runtime detection)
//! - NEON (aarch64)

use memchr::{memchr, memchr2};
use std::io::{BufRead, ErrorKind};
use std::ops::ControlFlow;

use crate::error::Result;

/// Byte scanner that consumes only what it returns
pub struct ByteScanner<R: BufRead> {
    reader: R,
    consumed: u64,
}

impl<R: BufRead> ByteScanner<R> {
    pub fn new(reader: R) -> Self {
        ByteScanner {
            reader,
            consumed: 0,
        }
    }

    /// Number of bytes consumed so far
    #[inline]
    pub fn position(&self) -> u64 {
        self.consumed
    }

    /// Give back the underlying reader. Unconsumed input is still in it.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Hand the buffered bytes to `scan`, refilling first when the buffer is
    /// drained, then consume as many bytes as `scan` reports. `scan` sees an
    /// empty slice at end of input.
    #[inline]
    fn with_available<T>(&mut self, scan: impl FnOnce(&[u8]) -> (usize, T)) -> Result<T> {
        let (used, out) = loop {
            match self.reader.fill_buf() {
                Ok(available) => break scan(available),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };
        self.reader.consume(used);
        self.consumed += used as u64;
        Ok(out)
    }

    /// Read the next byte, `None` at end of input
    #[inline]
    pub fn next_byte(&mut self) -> Result<Option<u8>> {
        self.with_available(|available| match available.first() {
            Some(&b) => (1, Some(b)),
            None => (0, None),
        })
    }

    /// Consume whitespace, returning the first significant byte (consumed)
    /// or `None` if the input ends first.
    pub fn skip_whitespace(&mut self) -> Result<Option<u8>> {
        while let Some(b) = self.next_byte()? {
            if !is_whitespace(b) {
                return Ok(Some(b));
            }
        }
        Ok(None)
    }

    /// Append bytes to `out` until `<` or `&` is found.
    ///
    /// Returns the delimiter, or `None` at end of input. `&` is consumed;
    /// `<` stays in the stream as the start of the next construct.
    pub fn read_text_run(&mut self, out: &mut Vec<u8>) -> Result<Option<u8>> {
        loop {
            let step = self.with_available(|available| {
                if available.is_empty() {
                    return (0, ControlFlow::Break(None));
                }
                match memchr2(b'<', b'&', available) {
                    Some(i) => {
                        out.extend_from_slice(&available[..i]);
                        let delimiter = available[i];
                        let used = if delimiter == b'&' { i + 1 } else { i };
                        (used, ControlFlow::Break(Some(delimiter)))
                    }
                    None => {
                        out.extend_from_slice(available);
                        (available.len(), ControlFlow::Continue(()))
                    }
                }
            })?;
            if let ControlFlow::Break(delimiter) = step {
                return Ok(delimiter);
            }
        }
    }

    /// Append bytes to `out` until `delimiter` is found.
    ///
    /// The delimiter is consumed but not appended. Returns false if the input
    /// ends before the delimiter.
    pub fn read_until(&mut self, delimiter: u8, out: &mut Vec<u8>) -> Result<bool> {
        loop {
            let step = self.with_available(|available| {
                if available.is_empty() {
                    return (0, ControlFlow::Break(false));
                }
                match memchr(delimiter, available) {
                    Some(i) => {
                        out.extend_from_slice(&available[..i]);
                        (i + 1, ControlFlow::Break(true))
                    }
                    None => {
                        out.extend_from_slice(available);
                        (available.len(), ControlFlow::Continue(()))
                    }
                }
            })?;
            if let ControlFlow::Break(found) = step {
                return Ok(found);
            }
        }
    }
}

/// Check if byte is whitespace: space, tab, LF, VT, FF, CR
#[inline]
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor, Read};

    fn chunked(input: &[u8], capacity: usize) -> ByteScanner<BufReader<Cursor<Vec<u8>>>> {
        ByteScanner::new(BufReader::with_capacity(capacity, Cursor::new(input.to_vec())))
    }

    #[test]
    fn test_next_byte_and_eof() {
        let mut scanner = ByteScanner::new(&b"ab"[..]);
        assert_eq!(scanner.next_byte().unwrap(), Some(b'a'));
        assert_eq!(scanner.next_byte().unwrap(), Some(b'b'));
        assert_eq!(scanner.next_byte().unwrap(), None);
        assert_eq!(scanner.position(), 2);
    }

    #[test]
    fn test_skip_whitespace() {
        let mut scanner = ByteScanner::new(&b"  \t\n hello"[..]);
        assert_eq!(scanner.skip_whitespace().unwrap(), Some(b'h'));
        assert_eq!(scanner.position(), 6);

        let mut blank = ByteScanner::new(&b"   "[..]);
        assert_eq!(blank.skip_whitespace().unwrap(), None);
    }

    #[test]
    fn test_vertical_tab_and_form_feed_are_whitespace() {
        assert!(is_whitespace(0x0B));
        assert!(is_whitespace(0x0C));
        assert!(!is_whitespace(0x00));
        assert!(!is_whitespace(0xA0));

        let mut scanner = ByteScanner::new(&b"\x0B\x0Cx"[..]);
        assert_eq!(scanner.skip_whitespace().unwrap(), Some(b'x'));
    }

    #[test]
    fn test_read_text_run_across_chunks() {
        let mut scanner = chunked(b"hello world&amp;", 3);
        let mut out = Vec::new();
        assert_eq!(scanner.read_text_run(&mut out).unwrap(), Some(b'&'));
        assert_eq!(out, b"hello world");
        assert_eq!(scanner.position(), 12);
    }

    #[test]
    fn test_read_text_run_leaves_tag_open() {
        let mut scanner = chunked(b"ab<c", 2);
        let mut out = Vec::new();
        assert_eq!(scanner.read_text_run(&mut out).unwrap(), Some(b'<'));
        assert_eq!(out, b"ab");
        assert_eq!(scanner.position(), 2);
        assert_eq!(scanner.next_byte().unwrap(), Some(b'<'));
    }

    #[test]
    fn test_read_text_run_to_eof() {
        let mut scanner = ByteScanner::new(&b"tail"[..]);
        let mut out = Vec::new();
        assert_eq!(scanner.read_text_run(&mut out).unwrap(), None);
        assert_eq!(out, b"tail");
    }

    #[test]
    fn test_read_until() {
        let mut scanner = chunked(b"quot;rest", 2);
        let mut out = Vec::new();
        assert!(scanner.read_until(b';', &mut out).unwrap());
        assert_eq!(out, b"quot");
        assert_eq!(scanner.next_byte().unwrap(), Some(b'r'));

        let mut unterminated = ByteScanner::new(&b"amp"[..]);
        let mut out = Vec::new();
        assert!(!unterminated.read_until(b';', &mut out).unwrap());
    }

    #[test]
    fn test_unconsumed_bytes_stay_in_reader() {
        let mut scanner = chunked(b"xyz-rest", 64);
        let mut out = Vec::new();
        assert!(scanner.read_until(b'-', &mut out).unwrap());

        let mut rest = String::new();
        scanner.into_inner().read_to_string(&mut rest).unwrap();
        assert_eq!(rest, "rest");
    }
}
