//! End-to-end parsing scenarios through the public façade.

use folio_parser::{ParseError, Parser};
use folio_tree::{Node, NodeKind, SyntaxId};
use pretty_assertions::assert_eq;

#[test]
fn test_level_two_heading_followed_by_paragraph() {
    let parser = Parser::with_defaults();
    let doc = parser.parse("== Title ==\nBody", &SyntaxId::wiki()).unwrap();

    assert_eq!(doc.kind, NodeKind::Document);
    assert_eq!(doc.children.len(), 2);

    let heading = &doc.children[0];
    assert_eq!(heading.kind, NodeKind::Heading { level: 2 });
    assert_eq!(heading.text_content(), "Title");

    let paragraph = &doc.children[1];
    assert_eq!(paragraph.kind, NodeKind::Paragraph);
    assert_eq!(paragraph.text_content(), "Body");
}

#[test]
fn test_unresolvable_link_mid_paragraph_does_not_fail() {
    let parser = Parser::with_defaults();
    let doc = parser
        .parse("Read [[the guide>>{{bad}}]] first.", &SyntaxId::wiki())
        .unwrap();

    assert_eq!(
        doc,
        Node::document(vec![Node::paragraph(vec![
            Node::text("Read "),
            Node::broken_link("{{bad}}", vec![Node::text("the guide")]),
            Node::text(" first."),
        ])])
    );
}

#[test]
fn test_same_text_different_syntaxes() {
    let parser = Parser::with_defaults();
    let text = "== Title ==";

    let wiki = parser.parse(text, &SyntaxId::wiki()).unwrap();
    let plain = parser.parse(text, &SyntaxId::plain()).unwrap();

    assert_eq!(wiki.children[0].kind, NodeKind::Heading { level: 2 });
    assert_eq!(plain.children[0].kind, NodeKind::Paragraph);
}

#[test]
fn test_markdown_and_wiki_agree_on_simple_documents() {
    let parser = Parser::with_defaults();
    let wiki = parser
        .parse("== Title ==\n\nSome **bold** text.", &SyntaxId::wiki())
        .unwrap();
    let markdown = parser
        .parse("## Title\n\nSome **bold** text.", &SyntaxId::markdown())
        .unwrap();
    assert_eq!(wiki, markdown);
}

#[test]
fn test_unregistered_syntax() {
    let parser = Parser::builder().build();
    let err = parser.parse("x", &SyntaxId::plain()).unwrap_err();
    assert!(matches!(err, ParseError::UnsupportedSyntax(_)));
}
