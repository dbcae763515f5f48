//! Event Serialization
//!
//! Renders events back to XML text:
//! - Start: `<prefix:local attr="value">`, prefix omitted when empty,
//!   attribute values escape only `"`
//! - End: `</prefix:local>`
//! - Characters: `&`, `<`, `>` escaped
//! - Comment: `<!--text-->`
//! - Processing instruction: `<?target data?>`
//!
//! Self-closing tags come back as a start/end pair; the XML declaration is
//! never produced because the reader discards it.

use std::io::{self, Write};

use crate::core::entities::{encode_attribute, encode_text};
use crate::core::qname::QName;
use crate::reader::events::XmlEvent;

/// Append the rendering of a name to `buf`
fn push_name(buf: &mut String, name: &QName) {
    if name.has_prefix() {
        buf.push_str(name.prefix());
        buf.push(':');
    }
    buf.push_str(name.local_part());
}

/// Append the XML text of one event to `buf`
pub fn render_event_to(buf: &mut String, event: &XmlEvent) {
    match event {
        XmlEvent::StartElement(e) => {
            buf.push('<');
            push_name(buf, e.name());
            for attr in e.attributes() {
                buf.push(' ');
                push_name(buf, attr.name());
                buf.push_str("=\"");
                buf.push_str(&encode_attribute(attr.value()));
                buf.push('"');
            }
            buf.push('>');
        }
        XmlEvent::EndElement(e) => {
            buf.push_str("</");
            push_name(buf, e.name());
            buf.push('>');
        }
        XmlEvent::Characters(c) => buf.push_str(&encode_text(c.text())),
        XmlEvent::Comment(c) => {
            buf.push_str("<!--");
            buf.push_str(c.text());
            buf.push_str("-->");
        }
        XmlEvent::ProcessingInstruction(pi) => {
            buf.push_str("<?");
            buf.push_str(pi.target());
            buf.push(' ');
            buf.push_str(pi.data());
            buf.push_str("?>");
        }
    }
}

/// XML text of one event
pub fn render_event(event: &XmlEvent) -> String {
    let mut buf = String::new();
    render_event_to(&mut buf, event);
    buf
}

/// XML text of an event sequence
pub fn render_events<'a>(events: impl IntoIterator<Item = &'a XmlEvent>) -> String {
    let mut buf = String::with_capacity(256);
    for event in events {
        render_event_to(&mut buf, event);
    }
    buf
}

/// Writes rendered events to any `Write` sink
pub struct EventWriter<W: Write> {
    writer: W,
    buf: String,
}

impl<W: Write> EventWriter<W> {
    pub fn new(writer: W) -> Self {
        EventWriter {
            writer,
            buf: String::with_capacity(256),
        }
    }

    /// Write one event
    pub fn write_event(&mut self, event: &XmlEvent) -> io::Result<()> {
        self.buf.clear();
        render_event_to(&mut self.buf, event);
        self.writer.write_all(self.buf.as_bytes())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
