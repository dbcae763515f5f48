//! End-to-end reader behaviour over whole documents

use std::io::Cursor;

use rustystax::{
    parse_str, render_events, Attribute, Characters, Comment, EndElement, ErrorKind,
    EventReader, ProcessingInstruction, QName, StartElement, XmlError, XmlEvent, XmlInputFactory,
};

fn start(name: &str, attrs: &[(&str, &str)]) -> XmlEvent {
    StartElement::new(
        QName::local(name),
        attrs
            .iter()
            .map(|(n, v)| Attribute::new(QName::local(*n), *v))
            .collect(),
    )
    .into()
}

fn end(name: &str) -> XmlEvent {
    EndElement::new(QName::local(name)).into()
}

#[test]
fn test_self_closing_tag() {
    assert_eq!(parse_str("<a/>").unwrap(), vec![start("a", &[]), end("a")]);
}

#[test]
fn test_attributes_and_text() {
    assert_eq!(
        parse_str(r#"<a b="1" c='2'>text</a>"#).unwrap(),
        vec![
            start("a", &[("b", "1"), ("c", "2")]),
            Characters::new("text").into(),
            end("a"),
        ]
    );
}

#[test]
fn test_entities_make_one_text_event() {
    assert_eq!(
        parse_str("<t>&amp;&lt;&gt;&apos;&quot;</t>").unwrap(),
        vec![start("t", &[]), Characters::new("&<>'\"").into(), end("t")]
    );
}

#[test]
fn test_unresolved_entity_names_entity() {
    match parse_str("<t>&foo;</t>") {
        Err(XmlError::UnresolvedEntity { name }) => assert_eq!(name, "foo"),
        other => panic!("expected unresolved entity, got {other:?}"),
    }
}

#[test]
fn test_comment_with_double_dash() {
    assert_eq!(
        parse_str("<!-- a -- b -->").unwrap(),
        vec![XmlEvent::from(Comment::new(" a -- b "))]
    );
}

#[test]
fn test_processing_instructions() {
    assert!(parse_str(r#"<?xml version="1.0"?>"#).unwrap().is_empty());
    assert_eq!(
        parse_str("<?target data?>").unwrap(),
        vec![XmlEvent::from(ProcessingInstruction::new("target", "data"))]
    );
    assert_eq!(
        parse_str("<?target a?b?>").unwrap(),
        vec![XmlEvent::from(ProcessingInstruction::new("target", "a?b"))]
    );
}

#[test]
fn test_sequencing_error() {
    let mut reader = EventReader::new(Cursor::new(b"<a/>".to_vec()));
    reader.next_event().unwrap();
    reader.next_event().unwrap();
    assert!(!reader.has_next().unwrap());
    assert_eq!(reader.next_event().unwrap_err().kind(), ErrorKind::Sequencing);
}

#[test]
fn test_document_with_everything() {
    let input = concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
        "<?xml-stylesheet type=\"text/xsl\" href=\"style.xsl\"?>\n",
        "<!-- catalogue -->\n",
        "<cat:books xmlns:cat=\"urn:x\">\n",
        "  <book id='1' cat:lang=\"en\">Rust &amp; XML</book>\n",
        "  <empty/>\n",
        "</cat:books>\n",
    );
    let events = parse_str(input).unwrap();
    let kinds: Vec<_> = events.iter().map(XmlEvent::kind_name).collect();
    assert_eq!(
        kinds,
        [
            "Characters",
            "ProcessingInstruction",
            "Characters",
            "Comment",
            "Characters",
            "StartElement",
            "Characters",
            "StartElement",
            "Characters",
            "EndElement",
            "Characters",
            "StartElement",
            "EndElement",
            "Characters",
            "EndElement",
            "Characters",
        ]
    );

    let root = events[5].as_start_element().unwrap();
    assert_eq!(root.name(), &QName::prefixed("cat", "books"));
    assert_eq!(root.attributes()[0].name(), &QName::prefixed("xmlns", "cat"));
    assert_eq!(root.name().namespace_uri(), "");

    let book = events[7].as_start_element().unwrap();
    assert_eq!(book.attribute_value("lang"), Some("en"));
    assert_eq!(events[8].as_characters().unwrap().text(), "Rust & XML");
    assert!(events[0].as_characters().unwrap().is_whitespace());
}

#[test]
fn test_incomplete_document_is_an_error() {
    let mut reader = XmlInputFactory::new().create_event_reader(&b"<a>text</a"[..]);
    assert!(reader.next_event().unwrap().is_start_element());
    assert!(reader.next_event().unwrap().is_characters());
    assert_eq!(reader.has_next().unwrap_err().kind(), ErrorKind::Incomplete);
}

#[test]
fn test_rerendering_matches_source() {
    let input = r#"<p:doc a="1" b="x &quot;y&quot;"><!--c--><?pi d?>1 &lt; 2</p:doc>"#;
    assert_eq!(render_events(&parse_str(input).unwrap()), input);
}
