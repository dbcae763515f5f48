//! Qualified names

use std::fmt;

/// Qualified name: namespace URI, local part and prefix.
///
/// The prefix is the empty string when the source name had none. Prefixes
/// are never mapped to a namespace, so names produced by the reader always
/// carry an empty namespace URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct QName {
    namespace_uri: String,
    local_part: String,
    prefix: String,
}

impl QName {
    /// Create a qualified name from all three parts
    pub fn new(
        namespace_uri: impl Into<String>,
        local_part: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        QName {
            namespace_uri: namespace_uri.into(),
            local_part: local_part.into(),
            prefix: prefix.into(),
        }
    }

    /// Create an unprefixed name
    pub fn local(local_part: impl Into<String>) -> Self {
        QName::new("", local_part, "")
    }

    /// Create a prefixed name with no namespace URI
    pub fn prefixed(prefix: impl Into<String>, local_part: impl Into<String>) -> Self {
        QName::new("", local_part, prefix)
    }

    pub fn namespace_uri(&self) -> &str {
        &self.namespace_uri
    }

    pub fn local_part(&self) -> &str {
        &self.local_part
    }

    /// Namespace prefix, empty if none
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn has_prefix(&self) -> bool {
        !self.prefix.is_empty()
    }
}

/// Renders `prefix:local`, or just `local` when unprefixed
impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_prefix() {
            write!(f, "{}:{}", self.prefix, self.local_part)
        } else {
            f.write_str(&self.local_part)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_name() {
        let name = QName::local("div");
        assert_eq!(name.local_part(), "div");
        assert_eq!(name.prefix(), "");
        assert_eq!(name.namespace_uri(), "");
        assert!(!name.has_prefix());
        assert_eq!(name.to_string(), "div");
    }

    #[test]
    fn test_namespaced_name() {
        let name = QName::prefixed("svg", "rect");
        assert_eq!(name.to_string(), "svg:rect");
        assert_eq!(name, QName::new("", "rect", "svg"));
        assert_ne!(name, QName::new("http://www.w3.org/2000/svg", "rect", "svg"));
    }
}
