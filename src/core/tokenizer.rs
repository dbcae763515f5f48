//! XML Tokenizer - State machine for XML event extraction
//!
//! Each call to [`Tokenizer::scan_next`] consumes exactly one lexical
//! construct from the stream and queues the events it produces:
//! - Element start/end tags (a self-closing tag queues both)
//! - Text content, with entity references resolved inline
//! - Comments
//! - Processing instructions (the XML declaration is consumed silently)
//!
//! Dispatch on the byte after `<`:
//! - `?` processing instruction or XML declaration
//! - `/` end tag
//! - `!` markup declaration, only `<!--` is implemented
//! - letter or `_` start tag
//!
//! Every malformed or unsupported input is fatal. End of input is only a
//! clean result between constructs; inside one it is [`XmlError::Incomplete`].
//! No nesting stack is kept, so end tags are not matched to start tags.

use std::collections::VecDeque;
use std::io::BufRead;

use tracing::{debug, trace};

use super::attributes::Attribute;
use super::entities::resolve_entity;
use super::qname::QName;
use super::scanner::{is_whitespace, ByteScanner};
use crate::error::{Result, XmlError};
use crate::reader::events::{
    Characters, Comment, EndElement, ProcessingInstruction, StartElement, XmlEvent,
};

/// Terminator of a comment body
const COMMENT_END: &[u8; 3] = b"-->";

/// Outcome of one scan step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// One or more events were queued
    Queued,
    /// A construct was consumed without producing an event (XML declaration)
    Skipped,
    /// Clean end of input between constructs
    EndOfInput,
}

/// Check if byte can start an element name
#[inline]
fn is_name_start_byte(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

/// Check if byte can continue an element or attribute name
#[inline]
fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.')
}

/// Decode accumulated bytes as UTF-8
fn decode(bytes: Vec<u8>, context: &str, offset: u64) -> Result<String> {
    String::from_utf8(bytes)
        .map_err(|_| XmlError::malformed(format!("invalid UTF-8 in {context}"), offset))
}

/// Accumulates a possibly prefixed name, split at a single `:`
struct NameBuilder {
    prefix: Option<Vec<u8>>,
    local: Vec<u8>,
    context: &'static str,
}

impl NameBuilder {
    fn new(context: &'static str) -> Self {
        NameBuilder {
            prefix: None,
            local: Vec::with_capacity(16),
            context,
        }
    }

    #[inline]
    fn push(&mut self, b: u8) {
        self.local.push(b);
    }

    /// Bytes seen so far become the prefix
    fn split(&mut self, offset: u64) -> Result<()> {
        if self.prefix.is_some() {
            return Err(XmlError::unsupported(
                format!("there can't be two prefixes in {}", self.context),
                offset,
            ));
        }
        self.prefix = Some(std::mem::take(&mut self.local));
        Ok(())
    }

    fn finish(self, offset: u64) -> Result<QName> {
        let prefix = match self.prefix {
            Some(p) => decode(p, self.context, offset)?,
            None => String::new(),
        };
        let local = decode(self.local, self.context, offset)?;
        Ok(QName::new("", local, prefix))
    }
}

/// Lexical state machine over a byte stream
pub struct Tokenizer<R: BufRead> {
    scanner: ByteScanner<R>,
}

impl<R: BufRead> Tokenizer<R> {
    /// Create a tokenizer reading from the given scanner
    pub fn new(scanner: ByteScanner<R>) -> Self {
        Tokenizer { scanner }
    }

    /// Bytes consumed from the stream so far
    pub fn position(&self) -> u64 {
        self.scanner.position()
    }

    pub fn into_inner(self) -> R {
        self.scanner.into_inner()
    }

    /// Scan one construct, appending its events to `queue`
    pub fn scan_next(&mut self, queue: &mut VecDeque<XmlEvent>) -> Result<ScanOutcome> {
        match self.scanner.next_byte()? {
            None => {
                debug!(offset = self.position(), "end of input");
                Ok(ScanOutcome::EndOfInput)
            }
            Some(b'<') => self.scan_markup(queue),
            Some(first) => {
                self.scan_text(first, queue)?;
                Ok(ScanOutcome::Queued)
            }
        }
    }

    /// Offset of the most recently consumed byte
    #[inline]
    fn offset(&self) -> u64 {
        self.scanner.position().saturating_sub(1)
    }

    /// Read a byte that must exist inside `construct`
    #[inline]
    fn require_byte(&mut self, construct: &'static str) -> Result<u8> {
        self.scanner
            .next_byte()?
            .ok_or_else(|| XmlError::incomplete(construct))
    }

    fn emit(&self, queue: &mut VecDeque<XmlEvent>, event: XmlEvent) {
        trace!(kind = event.kind_name(), offset = self.position(), "queued event");
        queue.push_back(event);
    }

    // ------------------------------------------------------------------
    // Markup dispatch
    // ------------------------------------------------------------------

    fn scan_markup(&mut self, queue: &mut VecDeque<XmlEvent>) -> Result<ScanOutcome> {
        let lead = self.require_byte("tag")?;

        match lead {
            b'?' => self.scan_processing_instruction(queue),
            b'/' => {
                self.scan_end_tag(queue)?;
                Ok(ScanOutcome::Queued)
            }
            b'!' => {
                self.scan_markup_declaration(queue)?;
                Ok(ScanOutcome::Queued)
            }
            b if is_name_start_byte(b) => {
                self.scan_start_tag(b, queue)?;
                Ok(ScanOutcome::Queued)
            }
            b => Err(XmlError::unexpected_byte(b, "at the start of a tag", self.offset())),
        }
    }

    // ------------------------------------------------------------------
    // Element tags
    // ------------------------------------------------------------------

    fn scan_start_tag(&mut self, first: u8, queue: &mut VecDeque<XmlEvent>) -> Result<()> {
        let mut name = NameBuilder::new("an element name");
        name.push(first);

        loop {
            let b = self.require_byte("start tag")?;
            match b {
                b':' => name.split(self.offset())?,
                b'>' => {
                    let name = name.finish(self.offset())?;
                    self.emit(queue, StartElement::new(name, Vec::new()).into());
                    return Ok(());
                }
                b'/' => {
                    self.expect_empty_tag_close()?;
                    let name = name.finish(self.offset())?;
                    self.emit_empty_element(name, Vec::new(), queue);
                    return Ok(());
                }
                b if is_whitespace(b) => {
                    let name = name.finish(self.offset())?;
                    return self.scan_start_tag_attributes(name, queue);
                }
                b if is_name_byte(b) => name.push(b),
                b => {
                    return Err(XmlError::unexpected_byte(
                        b,
                        "in a start tag name",
                        self.offset(),
                    ))
                }
            }
        }
    }

    /// Remainder of a start tag after the name: attributes up to `>` or `/>`
    fn scan_start_tag_attributes(
        &mut self,
        name: QName,
        queue: &mut VecDeque<XmlEvent>,
    ) -> Result<()> {
        let mut attributes = Vec::new();

        loop {
            let b = self
                .scanner
                .skip_whitespace()?
                .ok_or_else(|| XmlError::incomplete("start tag"))?;

            match b {
                b'>' => {
                    self.emit(queue, StartElement::new(name, attributes).into());
                    return Ok(());
                }
                b'/' => {
                    self.expect_empty_tag_close()?;
                    self.emit_empty_element(name, attributes, queue);
                    return Ok(());
                }
                b => attributes.push(self.scan_attribute(b)?),
            }
        }
    }

    /// After `/` in a start tag only `>` may follow
    fn expect_empty_tag_close(&mut self) -> Result<()> {
        match self.require_byte("start tag")? {
            b'>' => Ok(()),
            b => Err(XmlError::malformed(
                format!(
                    "empty element tag without closing '>', found 0x{:02X} after '/'",
                    b
                ),
                self.offset(),
            )),
        }
    }

    /// Queue the start/end pair of a self-closing tag
    fn emit_empty_element(
        &self,
        name: QName,
        attributes: Vec<Attribute>,
        queue: &mut VecDeque<XmlEvent>,
    ) {
        let end = EndElement::new(name.clone());
        self.emit(queue, StartElement::new(name, attributes).into());
        self.emit(queue, end.into());
    }

    fn scan_end_tag(&mut self, queue: &mut VecDeque<XmlEvent>) -> Result<()> {
        let mut name = NameBuilder::new("an end tag name");

        loop {
            let b = self.require_byte("end tag")?;
            match b {
                b':' => name.split(self.offset())?,
                b'>' => {
                    let name = name.finish(self.offset())?;
                    self.emit(queue, EndElement::new(name).into());
                    return Ok(());
                }
                b if is_name_byte(b) => name.push(b),
                b => {
                    return Err(XmlError::unexpected_byte(
                        b,
                        "in an end tag name",
                        self.offset(),
                    ))
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    fn scan_attribute(&mut self, first: u8) -> Result<Attribute> {
        let mut name = NameBuilder::new("an attribute name");

        if first == b':' {
            name.split(self.offset())?;
        } else if first.is_ascii_alphanumeric() || first == b'_' {
            name.push(first);
        } else {
            return Err(XmlError::unexpected_byte(
                first,
                "as first character of an attribute name",
                self.offset(),
            ));
        }

        loop {
            let b = self.require_byte("attribute name")?;
            match b {
                b':' => name.split(self.offset())?,
                b'=' => break,
                b if is_whitespace(b) => match self.scanner.skip_whitespace()? {
                    Some(b'=') => break,
                    Some(other) => {
                        return Err(XmlError::malformed(
                            format!(
                                "attribute name is malformed: expected '=', found 0x{:02X}",
                                other
                            ),
                            self.offset(),
                        ))
                    }
                    None => return Err(XmlError::incomplete("attribute")),
                },
                b if is_name_byte(b) => name.push(b),
                b => {
                    return Err(XmlError::unexpected_byte(
                        b,
                        "in an attribute name",
                        self.offset(),
                    ))
                }
            }
        }

        let name = name.finish(self.offset())?;
        let value = self.scan_attribute_value()?;
        Ok(Attribute::new(name, value))
    }

    /// Quoted value after `=`, entities resolved
    fn scan_attribute_value(&mut self) -> Result<String> {
        let delimiter = self
            .scanner
            .skip_whitespace()?
            .ok_or_else(|| XmlError::incomplete("attribute value"))?;

        if delimiter != b'\'' && delimiter != b'"' {
            return Err(XmlError::unexpected_byte(
                delimiter,
                "as attribute value delimiter, expected ''' or '\"'",
                self.offset(),
            ));
        }

        let start = self.offset();
        let mut value = Vec::new();

        loop {
            let b = self.require_byte("attribute value")?;
            if b == delimiter {
                return decode(value, "an attribute value", start);
            } else if b == b'&' {
                self.resolve_entity_into(&mut value)?;
            } else {
                value.push(b);
            }
        }
    }

    // ------------------------------------------------------------------
    // Text and entities
    // ------------------------------------------------------------------

    /// Text run up to the next `<` (left in the stream) or end of input
    fn scan_text(&mut self, first: u8, queue: &mut VecDeque<XmlEvent>) -> Result<()> {
        let start = self.offset();
        let mut text = Vec::new();

        if first == b'&' {
            self.resolve_entity_into(&mut text)?;
        } else {
            text.push(first);
        }

        loop {
            match self.scanner.read_text_run(&mut text)? {
                Some(b'<') => break,
                Some(_) => self.resolve_entity_into(&mut text)?,
                None => break,
            }
        }

        let text = decode(text, "character data", start)?;
        self.emit(queue, Characters::new(text).into());
        Ok(())
    }

    /// Resolve the entity whose `&` was just consumed, appending its
    /// replacement text to `out`
    fn resolve_entity_into(&mut self, out: &mut Vec<u8>) -> Result<()> {
        let first = self.require_byte("entity")?;
        if first == b';' {
            return Err(XmlError::malformed("entity has no name", self.offset()));
        }

        let mut name = vec![first];
        if !self.scanner.read_until(b';', &mut name)? {
            return Err(XmlError::incomplete("entity"));
        }

        match resolve_entity(&name) {
            Some(replacement) => {
                out.extend_from_slice(replacement.as_bytes());
                Ok(())
            }
            None => Err(XmlError::UnresolvedEntity {
                name: String::from_utf8_lossy(&name).into_owned(),
            }),
        }
    }

    // ------------------------------------------------------------------
    // Processing instructions
    // ------------------------------------------------------------------

    fn scan_processing_instruction(
        &mut self,
        queue: &mut VecDeque<XmlEvent>,
    ) -> Result<ScanOutcome> {
        let start = self.offset();
        let (target, closed) = self.scan_pi_target()?;

        if target.eq_ignore_ascii_case(b"xml") {
            // Declaration content is consumed, not decoded
            if !closed {
                self.scan_pi_body("XML declaration")?;
            }
            debug!(offset = start, "skipped XML declaration");
            return Ok(ScanOutcome::Skipped);
        }

        let data = if closed {
            Vec::new()
        } else {
            self.scan_pi_body("processing instruction data")?
        };

        let target = decode(target, "a processing instruction target", start)?;
        let data = decode(data, "processing instruction data", start)?;
        self.emit(queue, ProcessingInstruction::new(target, data).into());
        Ok(ScanOutcome::Queued)
    }

    /// Target name, ended by one whitespace byte or directly by `?>`.
    ///
    /// Returns the name and whether `?>` already closed the instruction.
    fn scan_pi_target(&mut self) -> Result<(Vec<u8>, bool)> {
        const CONSTRUCT: &str = "processing instruction target name";
        let mut name = Vec::new();

        loop {
            let b = self.require_byte(CONSTRUCT)?;

            if b == b'?' {
                if self.require_byte(CONSTRUCT)? != b'>' {
                    return Err(XmlError::malformed(
                        "processing instruction target name interrupted by '?'",
                        self.offset(),
                    ));
                }
                if name.is_empty() {
                    return Err(XmlError::malformed(
                        "processing instruction ended before its target name could be read",
                        self.offset(),
                    ));
                }
                return Ok((name, true));
            }

            if is_whitespace(b) {
                if name.is_empty() {
                    return Err(XmlError::malformed(
                        "processing instruction without target name",
                        self.offset(),
                    ));
                }
                return Ok((name, false));
            }

            if b == b'>' {
                return Err(XmlError::unexpected_byte(
                    b,
                    "in a processing instruction target name",
                    self.offset(),
                ));
            }

            if name.is_empty() && !b.is_ascii_alphabetic() {
                return Err(XmlError::unexpected_byte(
                    b,
                    "as first character of a processing instruction target name",
                    self.offset(),
                ));
            }

            name.push(b);
        }
    }

    /// Bytes up to the `?>` terminator. A `?` not directly followed by `>`
    /// is ordinary data.
    fn scan_pi_body(&mut self, construct: &'static str) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        let mut pending_question = false;

        loop {
            let b = self.require_byte(construct)?;
            match (pending_question, b) {
                (true, b'>') => return Ok(data),
                // The earlier '?' was data; this one may still start "?>"
                (true, b'?') => data.push(b'?'),
                (true, _) => {
                    data.push(b'?');
                    data.push(b);
                    pending_question = false;
                }
                (false, b'?') => pending_question = true,
                (false, _) => data.push(b),
            }
        }
    }

    // ------------------------------------------------------------------
    // Markup declarations and comments
    // ------------------------------------------------------------------

    fn scan_markup_declaration(&mut self, queue: &mut VecDeque<XmlEvent>) -> Result<()> {
        let b = self.require_byte("markup declaration")?;

        if b != b'-' {
            return Err(XmlError::unsupported(
                format!(
                    "markup declaration type '<!{}' not implemented",
                    b.escape_ascii()
                ),
                self.offset(),
            ));
        }

        if self.require_byte("comment")? != b'-' {
            return Err(XmlError::malformed(
                "comment malformed, expected '<!--'",
                self.offset(),
            ));
        }

        self.scan_comment(queue)
    }

    /// Comment body up to `-->`.
    ///
    /// The terminator is matched with a counter that restarts from zero on a
    /// mismatch: the partially matched bytes and the mismatching byte are all
    /// appended to the text, and the mismatching byte is not re-examined as
    /// a terminator start. `<!-- a --->` therefore does not end at `--->`.
    fn scan_comment(&mut self, queue: &mut VecDeque<XmlEvent>) -> Result<()> {
        let start = self.offset();
        let mut text = Vec::new();
        let mut matched = 0usize;

        loop {
            let b = self.require_byte("comment")?;

            if b == COMMENT_END[matched] {
                matched += 1;
                if matched == COMMENT_END.len() {
                    break;
                }
            } else {
                text.extend_from_slice(&COMMENT_END[..matched]);
                text.push(b);
                matched = 0;
            }
        }

        let text = decode(text, "a comment", start)?;
        self.emit(queue, Comment::new(text).into());
        Ok(())
    }
}
