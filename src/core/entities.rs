//! XML Entity Resolution
//!
//! Resolves the predefined entities: &lt; &gt; &amp; &quot; &apos;
//!
//! Numeric character references and catalogue-loaded entities are not
//! supported; anything outside the fixed table is unresolved.
//!
//! Also provides the escaping used when events are written back out.

use memchr::{memchr, memchr3};
use std::borrow::Cow;

/// Fixed entity table: name -> replacement text
pub const PREDEFINED_ENTITIES: [(&str, &str); 5] = [
    ("amp", "&"),
    ("lt", "<"),
    ("gt", ">"),
    ("apos", "'"),
    ("quot", "\""),
];

/// Look up the replacement text for an entity name (without & and ;)
#[inline]
pub fn resolve_entity(name: &[u8]) -> Option<&'static str> {
    PREDEFINED_ENTITIES
        .iter()
        .find(|(entity, _)| entity.as_bytes() == name)
        .map(|&(_, replacement)| replacement)
}

/// Escape character data: `&`, `<` and `>` only
pub fn encode_text(input: &str) -> Cow<'_, str> {
    // Fast path: check if any escaping needed
    if memchr3(b'&', b'<', b'>', input.as_bytes()).is_none() {
        return Cow::Borrowed(input);
    }

    let mut result = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Escape a double-quoted attribute value: only `"` is replaced
pub fn encode_attribute(input: &str) -> Cow<'_, str> {
    if memchr(b'"', input.as_bytes()).is_none() {
        return Cow::Borrowed(input);
    }
    Cow::Owned(input.replace('"', "&quot;"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predefined_entities() {
        for (name, replacement) in PREDEFINED_ENTITIES {
            assert_eq!(resolve_entity(name.as_bytes()), Some(replacement));
        }
    }

    #[test]
    fn test_resolve_each_entity() {
        assert_eq!(resolve_entity(b"amp"), Some("&"));
        assert_eq!(resolve_entity(b"lt"), Some("<"));
        assert_eq!(resolve_entity(b"gt"), Some(">"));
        assert_eq!(resolve_entity(b"apos"), Some("'"));
        assert_eq!(resolve_entity(b"quot"), Some("\""));
    }

    #[test]
    fn test_unknown_entity() {
        assert_eq!(resolve_entity(b"nbsp"), None);
        assert_eq!(resolve_entity(b"#65"), None);
        assert_eq!(resolve_entity(b"AMP"), None);
        assert_eq!(resolve_entity(b""), None);
    }

    #[test]
    fn test_encode_text() {
        assert!(matches!(encode_text("plain 'text' \"here\""), Cow::Borrowed(_)));
        assert_eq!(encode_text("<a> & b"), "&lt;a&gt; &amp; b");
    }

    #[test]
    fn test_encode_attribute() {
        assert!(matches!(encode_attribute("<&'>"), Cow::Borrowed(_)));
        assert_eq!(encode_attribute("say \"hi\" & <go>"), "say &quot;hi&quot; & <go>");
    }
}
