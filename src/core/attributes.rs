//! XML Attributes

use super::qname::QName;

/// A parsed XML attribute (value has entities resolved)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: QName,
    value: String,
}

impl Attribute {
    /// Create a new attribute
    pub fn new(name: QName, value: impl Into<String>) -> Self {
        Attribute {
            name,
            value: value.into(),
        }
    }

    pub fn name(&self) -> &QName {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Split into name and value
    pub fn into_parts(self) -> (QName, String) {
        (self.name, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_equality() {
        let a = Attribute::new(QName::prefixed("xml", "lang"), "en");
        let b = Attribute::new(QName::prefixed("xml", "lang"), "en".to_string());
        assert_eq!(a, b);
        assert_eq!(a.name().local_part(), "lang");
        assert_eq!(a.value(), "en");
        assert_ne!(a, Attribute::new(QName::local("lang"), "en"));
    }
}
