//! Reader Errors
//!
//! Every failure is fatal for the scan step that raised it. Events already
//! queued before the failure stay queued; nothing else is salvaged.

use thiserror::Error;

/// Result type for reader operations
pub type Result<T> = std::result::Result<T, XmlError>;

/// Errors that can occur while reading XML events
#[derive(Error, Debug)]
pub enum XmlError {
    /// End of input inside a tag, name, attribute, entity, comment or PI
    #[error("{construct} incomplete")]
    Incomplete { construct: &'static str },

    /// Unexpected or disallowed byte for the current lexical context
    #[error("{message} (at byte {offset})")]
    Malformed { message: String, offset: u64 },

    /// Recognized but unimplemented construct, or a repeated once-only part
    #[error("{message} (at byte {offset})")]
    Unsupported { message: String, offset: u64 },

    /// Entity name missing from the fixed entity table
    #[error("unable to resolve entity '&{name};'")]
    UnresolvedEntity { name: String },

    /// Caller asked for an event while none is available
    #[error("{0}")]
    Sequencing(&'static str),

    /// Underlying stream failure (never end-of-input)
    #[error("stream failure: {0}")]
    Io(#[from] std::io::Error),
}

/// Discriminant of an [`XmlError`], cheap to copy and compare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Incomplete,
    Malformed,
    Unsupported,
    UnresolvedEntity,
    Sequencing,
    Io,
}

impl XmlError {
    pub(crate) fn incomplete(construct: &'static str) -> Self {
        XmlError::Incomplete { construct }
    }

    pub(crate) fn malformed(message: impl Into<String>, offset: u64) -> Self {
        XmlError::Malformed {
            message: message.into(),
            offset,
        }
    }

    pub(crate) fn unsupported(message: impl Into<String>, offset: u64) -> Self {
        XmlError::Unsupported {
            message: message.into(),
            offset,
        }
    }

    /// Malformed error for a single offending byte, e.g.
    /// `character '#' (0x23) not supported in a start tag name`
    pub(crate) fn unexpected_byte(byte: u8, context: &str, offset: u64) -> Self {
        XmlError::malformed(
            format!("character {} (0x{:02X}) not supported {}", describe_byte(byte), byte, context),
            offset,
        )
    }

    /// Get the error category
    pub fn kind(&self) -> ErrorKind {
        match self {
            XmlError::Incomplete { .. } => ErrorKind::Incomplete,
            XmlError::Malformed { .. } => ErrorKind::Malformed,
            XmlError::Unsupported { .. } => ErrorKind::Unsupported,
            XmlError::UnresolvedEntity { .. } => ErrorKind::UnresolvedEntity,
            XmlError::Sequencing(_) => ErrorKind::Sequencing,
            XmlError::Io(_) => ErrorKind::Io,
        }
    }
}

/// Printable form of a byte for error messages
fn describe_byte(byte: u8) -> String {
    if byte.is_ascii_graphic() || byte == b' ' {
        format!("'{}'", byte as char)
    } else {
        format!("'{}'", byte.escape_ascii())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_byte_message() {
        let err = XmlError::unexpected_byte(b'#', "in a start tag name", 4);
        assert_eq!(err.kind(), ErrorKind::Malformed);
        assert_eq!(
            err.to_string(),
            "character '#' (0x23) not supported in a start tag name (at byte 4)"
        );
    }

    #[test]
    fn test_control_byte_is_escaped() {
        let err = XmlError::unexpected_byte(0x01, "in an end tag name", 0);
        assert!(err.to_string().starts_with("character '\\x01' (0x01)"));
    }

    #[test]
    fn test_unresolved_entity_message() {
        let err = XmlError::UnresolvedEntity { name: "foo".into() };
        assert_eq!(err.to_string(), "unable to resolve entity '&foo;'");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        let err: XmlError = io.into();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
