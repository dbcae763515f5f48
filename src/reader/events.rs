//! XML Event Types
//!
//! Event types for pull-parser style XML processing. Every event owns its
//! data; the reader hands ownership to the consumer on dequeue.

use crate::core::attributes::Attribute;
use crate::core::qname::QName;
use crate::core::scanner::is_whitespace;
use std::fmt;

/// XML parsing event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent {
    /// Start of an element: <name attrs...>
    StartElement(StartElement),
    /// End of an element: </name>, also emitted right after a self-closing start
    EndElement(EndElement),
    /// Text content between tags, entities resolved
    Characters(Characters),
    /// Comment content: <!--text-->
    Comment(Comment),
    /// Processing instruction: <?target data?>
    ProcessingInstruction(ProcessingInstruction),
}

/// Start element event data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartElement {
    name: QName,
    attributes: Vec<Attribute>,
}

impl StartElement {
    /// Create a new start element; attributes keep the given order
    pub fn new(name: QName, attributes: Vec<Attribute>) -> Self {
        StartElement { name, attributes }
    }

    pub fn name(&self) -> &QName {
        &self.name
    }

    /// Attributes in source order, duplicates included
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Get the first attribute with the given local part
    pub fn attribute(&self, local_part: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name().local_part() == local_part)
    }

    /// Get the first attribute value with the given local part
    pub fn attribute_value(&self, local_part: &str) -> Option<&str> {
        self.attribute(local_part).map(Attribute::value)
    }

    pub fn into_parts(self) -> (QName, Vec<Attribute>) {
        (self.name, self.attributes)
    }
}

/// End element event data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndElement {
    name: QName,
}

impl EndElement {
    pub fn new(name: QName) -> Self {
        EndElement { name }
    }

    pub fn name(&self) -> &QName {
        &self.name
    }
}

/// Character data event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Characters {
    text: String,
}

impl Characters {
    pub fn new(text: impl Into<String>) -> Self {
        Characters { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// True if the run is only XML whitespace
    pub fn is_whitespace(&self) -> bool {
        self.text.bytes().all(is_whitespace)
    }
}

/// Comment event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    text: String,
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Comment { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Processing instruction event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingInstruction {
    target: String,
    data: String,
}

impl ProcessingInstruction {
    pub fn new(target: impl Into<String>, data: impl Into<String>) -> Self {
        ProcessingInstruction {
            target: target.into(),
            data: data.into(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Everything between the target's separating whitespace and `?>`
    pub fn data(&self) -> &str {
        &self.data
    }
}

impl XmlEvent {
    /// Check if this is a start element event
    pub fn is_start_element(&self) -> bool {
        matches!(self, XmlEvent::StartElement(_))
    }

    /// Check if this is an end element event
    pub fn is_end_element(&self) -> bool {
        matches!(self, XmlEvent::EndElement(_))
    }

    /// Check if this is a text event
    pub fn is_characters(&self) -> bool {
        matches!(self, XmlEvent::Characters(_))
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, XmlEvent::Comment(_))
    }

    pub fn is_processing_instruction(&self) -> bool {
        matches!(self, XmlEvent::ProcessingInstruction(_))
    }

    /// Get as start element if applicable
    pub fn as_start_element(&self) -> Option<&StartElement> {
        match self {
            XmlEvent::StartElement(e) => Some(e),
            _ => None,
        }
    }

    /// Get as end element if applicable
    pub fn as_end_element(&self) -> Option<&EndElement> {
        match self {
            XmlEvent::EndElement(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_characters(&self) -> Option<&Characters> {
        match self {
            XmlEvent::Characters(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_comment(&self) -> Option<&Comment> {
        match self {
            XmlEvent::Comment(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_processing_instruction(&self) -> Option<&ProcessingInstruction> {
        match self {
            XmlEvent::ProcessingInstruction(pi) => Some(pi),
            _ => None,
        }
    }

    /// Short name of the event kind, used in logs
    pub fn kind_name(&self) -> &'static str {
        match self {
            XmlEvent::StartElement(_) => "StartElement",
            XmlEvent::EndElement(_) => "EndElement",
            XmlEvent::Characters(_) => "Characters",
            XmlEvent::Comment(_) => "Comment",
            XmlEvent::ProcessingInstruction(_) => "ProcessingInstruction",
        }
    }
}

impl From<StartElement> for XmlEvent {
    fn from(e: StartElement) -> Self {
        XmlEvent::StartElement(e)
    }
}

impl From<EndElement> for XmlEvent {
    fn from(e: EndElement) -> Self {
        XmlEvent::EndElement(e)
    }
}

impl From<Characters> for XmlEvent {
    fn from(c: Characters) -> Self {
        XmlEvent::Characters(c)
    }
}

impl From<Comment> for XmlEvent {
    fn from(c: Comment) -> Self {
        XmlEvent::Comment(c)
    }
}

impl From<ProcessingInstruction> for XmlEvent {
    fn from(pi: ProcessingInstruction) -> Self {
        XmlEvent::ProcessingInstruction(pi)
    }
}

/// Renders the event as XML text
impl fmt::Display for XmlEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::writer::render_event(self))
    }
}
