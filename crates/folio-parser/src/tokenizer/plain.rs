//! Plain text tokenizer.

use std::io::Read;

use folio_tree::SyntaxId;

use super::{Tokenizer, read_source};
use crate::error::TokenizeError;
use crate::event::{Event, Listener};

/// Tokenizer for `plain/1.0`.
///
/// Blank lines separate paragraphs; a single newline inside a paragraph is a
/// line break. No other markup is recognized.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTokenizer;

impl Tokenizer for PlainTokenizer {
    fn syntax(&self) -> SyntaxId {
        SyntaxId::plain()
    }

    fn tokenize(
        &self,
        source: &mut dyn Read,
        listener: &mut dyn Listener,
    ) -> Result<(), TokenizeError> {
        let text = read_source(source)?;

        listener.on_event(Event::BeginDocument)?;
        let mut in_paragraph = false;
        for line in text.lines() {
            if line.trim().is_empty() {
                if in_paragraph {
                    listener.on_event(Event::EndParagraph)?;
                    in_paragraph = false;
                }
                continue;
            }
            if in_paragraph {
                listener.on_event(Event::LineBreak)?;
            } else {
                listener.on_event(Event::BeginParagraph)?;
                in_paragraph = true;
            }
            listener.on_event(Event::Text(line.to_owned()))?;
        }
        if in_paragraph {
            listener.on_event(Event::EndParagraph)?;
        }
        listener.on_event(Event::EndDocument)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use folio_tree::Node;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::tokenizer::testing::parse_with;

    #[test]
    fn test_paragraphs_and_line_breaks() {
        let doc = parse_with(&PlainTokenizer, "first\nsecond\n\n\nthird\n").unwrap();
        assert_eq!(
            doc,
            Node::document(vec![
                Node::paragraph(vec![
                    Node::text("first"),
                    Node::line_break(),
                    Node::text("second"),
                ]),
                Node::paragraph(vec![Node::text("third")]),
            ])
        );
    }

    #[test]
    fn test_markup_is_literal() {
        let doc = parse_with(&PlainTokenizer, "== not a heading ==").unwrap();
        assert_eq!(
            doc,
            Node::document(vec![Node::paragraph(vec![Node::text("== not a heading ==")])])
        );
    }

    #[test]
    fn test_empty_input() {
        let doc = parse_with(&PlainTokenizer, "").unwrap();
        assert_eq!(doc, Node::document(Vec::new()));
    }

    #[test]
    fn test_crlf_input() {
        let doc = parse_with(&PlainTokenizer, "a\r\nb").unwrap();
        assert_eq!(doc.children[0].children.len(), 3);
    }
}
