//! Streaming Event Reader
//!
//! Pull-parser over any `BufRead` source. The consumer drives the scanner
//! with [`EventReader::has_next`] / [`EventReader::next_event`]; each probe
//! scans just one construct, so memory use stays bounded by the largest
//! single construct rather than the document. Input past that construct is
//! left in the source.

use std::collections::VecDeque;
use std::io::BufRead;

use tracing::debug;

use super::events::XmlEvent;
use crate::core::scanner::ByteScanner;
use crate::core::tokenizer::{ScanOutcome, Tokenizer};
use crate::error::{Result, XmlError};

/// Buffer size for plain `Read` sources
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Reader tuning knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Capacity of the `BufReader` put in front of a plain `Read` source
    pub buffer_capacity: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        ReaderOptions {
            buffer_capacity: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl ReaderOptions {
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity.max(1);
        self
    }
}

/// Pull-based XML event reader
pub struct EventReader<R: BufRead> {
    tokenizer: Tokenizer<R>,
    events: VecDeque<XmlEvent>,
    /// A probe ran since the consumer last dequeued, so `has_next` must not
    /// touch the stream again
    probed: bool,
    /// Set after a scan error; iteration stops
    failed: bool,
}

impl<R: BufRead> EventReader<R> {
    /// Create a reader over `reader`, scanning its buffer in place
    pub fn new(reader: R) -> Self {
        EventReader {
            tokenizer: Tokenizer::new(ByteScanner::new(reader)),
            events: VecDeque::with_capacity(2),
            probed: false,
            failed: false,
        }
    }

    /// Check whether another event is available.
    ///
    /// Queued events answer without I/O. Otherwise at most one probe runs
    /// until the next `next_event`; repeated calls after a probe that found
    /// nothing return `false` without reading.
    pub fn has_next(&mut self) -> Result<bool> {
        if !self.events.is_empty() {
            return Ok(true);
        }
        if self.probed {
            return Ok(false);
        }
        self.probed = true;

        loop {
            match self.scan()? {
                ScanOutcome::Queued => return Ok(true),
                ScanOutcome::EndOfInput => return Ok(false),
                // XML declaration produced nothing; probe the next construct
                ScanOutcome::Skipped => continue,
            }
        }
    }

    /// Dequeue the next event, transferring ownership to the caller.
    ///
    /// Probes first if `has_next` was not called. Fails with
    /// [`XmlError::Sequencing`] when no event is available.
    pub fn next_event(&mut self) -> Result<XmlEvent> {
        if self.events.is_empty() && !self.probed && !self.has_next()? {
            return Err(XmlError::Sequencing(
                "next_event() called while there is no event instead of checking has_next() first",
            ));
        }

        self.probed = false;

        self.events.pop_front().ok_or(XmlError::Sequencing(
            "next_event() called while there is no event, ignoring has_next() == false",
        ))
    }

    /// Bytes consumed from the stream so far
    pub fn position(&self) -> u64 {
        self.tokenizer.position()
    }

    /// Give back the underlying stream with any unconsumed input still in
    /// it; the reader never closes it
    pub fn into_inner(self) -> R {
        self.tokenizer.into_inner()
    }

    fn scan(&mut self) -> Result<ScanOutcome> {
        let outcome = self.tokenizer.scan_next(&mut self.events);
        if let Err(ref e) = outcome {
            debug!(error = %e, offset = self.tokenizer.position(), "scan failed");
            self.failed = true;
        }
        outcome
    }
}

/// Yields events until end of input or the first error, then stops
impl<R: BufRead> Iterator for EventReader<R> {
    type Item = Result<XmlEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.has_next() {
            Ok(true) => Some(self.next_event()),
            Ok(false) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

impl<R: BufRead> std::iter::FusedIterator for EventReader<R> {}
