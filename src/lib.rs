//! RustyStAX - streaming pull-based XML event reader
//!
//! Reads any `std::io::BufRead` byte stream and hands out XML events on
//! demand, without building a document tree or consuming input past the
//! construct being read:
//!
//! ```
//! use rustystax::{XmlEvent, XmlInputFactory};
//!
//! let input = br#"<?xml version="1.0"?><a b="1">text</a>"#;
//! let mut reader = XmlInputFactory::new().create_event_reader(&input[..]);
//!
//! while reader.has_next()? {
//!     match reader.next_event()? {
//!         XmlEvent::StartElement(e) => assert_eq!(e.attribute_value("b"), Some("1")),
//!         XmlEvent::Characters(c) => assert_eq!(c.text(), "text"),
//!         _ => {}
//!     }
//! }
//! # Ok::<(), rustystax::XmlError>(())
//! ```
//!
//! Scope: no DTDs, no CDATA sections, no numeric character references,
//! no namespace URI resolution, and no check that end tags match start tags.

pub mod core;
pub mod error;
pub mod reader;
pub mod writer;

use std::io::BufRead;

pub use crate::core::attributes::Attribute;
pub use crate::core::qname::QName;
pub use error::{ErrorKind, Result, XmlError};
pub use reader::events::{
    Characters, Comment, EndElement, ProcessingInstruction, StartElement, XmlEvent,
};
pub use reader::factory::XmlInputFactory;
pub use reader::stream::{EventReader, ReaderOptions, DEFAULT_BUFFER_SIZE};
pub use writer::{render_event, render_events, EventWriter};

/// Read every event from a stream
pub fn read_events<R: BufRead>(stream: R) -> Result<Vec<XmlEvent>> {
    EventReader::new(stream).collect()
}

/// Read every event from a string
pub fn parse_str(input: &str) -> Result<Vec<XmlEvent>> {
    read_events(input.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_str() {
        let events = parse_str("<a>x</a>").unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(render_events(&events), "<a>x</a>");
    }

    #[test]
    fn test_parse_str_error() {
        let err = parse_str("<a>&nope;</a>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnresolvedEntity);
    }
}
