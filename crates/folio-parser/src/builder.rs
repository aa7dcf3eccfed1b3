//! Tree builder: turns a structural event stream into a document tree.

use std::sync::Arc;

use folio_tree::{Node, NodeKind};

use crate::error::StructuralError;
use crate::event::{Event, Listener};
use crate::link::LinkResolver;

/// [`Listener`] assembling a [`Node`] tree from structural events.
///
/// Keeps an explicit stack of open nodes: begin events push, end events pop
/// the innermost node and append it to its parent, content events append to
/// the innermost node. Adjacent text events are merged into one text node.
///
/// A builder produces exactly one document; [`finish`](Self::finish)
/// consumes it.
pub struct TreeBuilder {
    link_resolver: Arc<dyn LinkResolver>,
    stack: Vec<Node>,
    document: Option<Node>,
}

impl TreeBuilder {
    /// Create a builder resolving links with `link_resolver`.
    #[must_use]
    pub fn new(link_resolver: Arc<dyn LinkResolver>) -> Self {
        Self {
            link_resolver,
            stack: Vec::new(),
            document: None,
        }
    }

    /// Return the completed document.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralError::Unclosed`] if elements are still open, or
    /// [`StructuralError::Empty`] if no document was ever opened.
    pub fn finish(self) -> Result<Node, StructuralError> {
        if let Some(document) = self.document {
            return Ok(document);
        }
        match self.stack.last() {
            Some(open) => Err(StructuralError::Unclosed(open.kind.name())),
            None => Err(StructuralError::Empty),
        }
    }

    fn open(&mut self, kind: NodeKind, event: &Event) -> Result<(), StructuralError> {
        self.check_open(event)?;
        self.stack.push(Node::new(kind, Vec::new()));
        Ok(())
    }

    fn append(&mut self, node: Node, event: &Event) -> Result<(), StructuralError> {
        self.check_open(event)?;
        if let Some(top) = self.stack.last_mut() {
            top.children.push(node);
        }
        Ok(())
    }

    fn append_text(&mut self, text: String, event: &Event) -> Result<(), StructuralError> {
        self.check_open(event)?;
        let Some(top) = self.stack.last_mut() else {
            return Ok(());
        };
        if let Some(Node {
            kind: NodeKind::Text(previous),
            ..
        }) = top.children.last_mut()
        {
            previous.push_str(&text);
        } else {
            top.children.push(Node::text(text));
        }
        Ok(())
    }

    /// Pop the innermost node if `closes` accepts its kind.
    fn close<F>(&mut self, event: &Event, closes: F) -> Result<(), StructuralError>
    where
        F: Fn(&NodeKind) -> bool,
    {
        self.check_open(event)?;
        // The document root stays on the stack until `EndDocument`.
        let top = match self.stack.as_slice() {
            [_root] => None,
            [.., top] => Some(top),
            [] => None,
        };
        match top {
            Some(node) if closes(&node.kind) => {}
            Some(node) => {
                return Err(StructuralError::Mismatched {
                    open: node.kind.name(),
                    found: event.name(),
                });
            }
            None => {
                return Err(StructuralError::Mismatched {
                    open: NodeKind::Document.name(),
                    found: event.name(),
                });
            }
        }
        if let Some(node) = self.stack.pop()
            && let Some(parent) = self.stack.last_mut()
        {
            parent.children.push(node);
        }
        Ok(())
    }

    fn check_open(&self, event: &Event) -> Result<(), StructuralError> {
        if self.document.is_some() {
            return Err(StructuralError::AfterEnd(event.name()));
        }
        if self.stack.is_empty() {
            return Err(StructuralError::BeforeBegin(event.name()));
        }
        Ok(())
    }

    fn begin_document(&mut self) -> Result<(), StructuralError> {
        if self.document.is_some() {
            return Err(StructuralError::AfterEnd(Event::BeginDocument.name()));
        }
        if let Some(open) = self.stack.last() {
            return Err(StructuralError::Mismatched {
                open: open.kind.name(),
                found: Event::BeginDocument.name(),
            });
        }
        self.stack.push(Node::document(Vec::new()));
        Ok(())
    }

    fn end_document(&mut self) -> Result<(), StructuralError> {
        self.check_open(&Event::EndDocument)?;
        if self.stack.len() > 1 {
            let open = self.stack.last().map_or("document", |n| n.kind.name());
            return Err(StructuralError::Mismatched {
                open,
                found: Event::EndDocument.name(),
            });
        }
        self.document = self.stack.pop();
        Ok(())
    }

    fn begin_link(&mut self, raw: String, event: &Event) -> Result<(), StructuralError> {
        let kind = match self.link_resolver.resolve(&raw) {
            Ok(target) => NodeKind::Link { target },
            Err(unresolved) => {
                tracing::debug!(target = %raw, reason = %unresolved.reason, "Broken link");
                NodeKind::BrokenLink { raw }
            }
        };
        self.open(kind, event)
    }
}

impl Listener for TreeBuilder {
    fn on_event(&mut self, event: Event) -> Result<(), StructuralError> {
        match event {
            Event::BeginDocument => self.begin_document(),
            Event::EndDocument => self.end_document(),
            Event::BeginSection { level } => self.open(NodeKind::Section { level }, &event),
            Event::BeginHeading { level } => self.open(NodeKind::Heading { level }, &event),
            Event::BeginParagraph => self.open(NodeKind::Paragraph, &event),
            Event::BeginList { ordered } => self.open(NodeKind::List { ordered }, &event),
            Event::BeginListItem => self.open(NodeKind::ListItem, &event),
            Event::BeginEmphasis => self.open(NodeKind::Emphasis, &event),
            Event::BeginStrong => self.open(NodeKind::Strong, &event),
            Event::BeginLink { ref target } => {
                let raw = target.clone();
                self.begin_link(raw, &event)
            }
            Event::EndSection => {
                self.close(&event, |k| matches!(k, NodeKind::Section { .. }))
            }
            Event::EndHeading => {
                self.close(&event, |k| matches!(k, NodeKind::Heading { .. }))
            }
            Event::EndParagraph => self.close(&event, |k| *k == NodeKind::Paragraph),
            Event::EndList => self.close(&event, |k| matches!(k, NodeKind::List { .. })),
            Event::EndListItem => self.close(&event, |k| *k == NodeKind::ListItem),
            Event::EndEmphasis => self.close(&event, |k| *k == NodeKind::Emphasis),
            Event::EndStrong => self.close(&event, |k| *k == NodeKind::Strong),
            Event::EndLink => self.close(&event, |k| {
                matches!(k, NodeKind::Link { .. } | NodeKind::BrokenLink { .. })
            }),
            Event::Text(ref text) => {
                let text = text.clone();
                self.append_text(text, &event)
            }
            Event::Code(ref code) => {
                let node = Node::code(code.clone());
                self.append(node, &event)
            }
            Event::LineBreak => self.append(Node::line_break(), &event),
            Event::HorizontalRule => self.append(Node::horizontal_rule(), &event),
            Event::Macro {
                ref name,
                ref params,
                ref content,
            } => {
                let node = Node::macro_call(name.clone(), params.clone(), content.clone());
                self.append(node, &event)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use folio_tree::LinkTarget;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::link::{DefaultLinkResolver, PageSetLinkResolver};

    fn build(events: Vec<Event>) -> Result<Node, StructuralError> {
        let mut builder = TreeBuilder::new(Arc::new(DefaultLinkResolver));
        for event in events {
            builder.on_event(event)?;
        }
        builder.finish()
    }

    #[test]
    fn test_builds_nested_tree() {
        let doc = build(vec![
            Event::BeginDocument,
            Event::BeginSection { level: 1 },
            Event::BeginHeading { level: 1 },
            Event::Text("Intro".to_owned()),
            Event::EndHeading,
            Event::BeginParagraph,
            Event::Text("Hello ".to_owned()),
            Event::BeginStrong,
            Event::Text("world".to_owned()),
            Event::EndStrong,
            Event::EndParagraph,
            Event::EndSection,
            Event::EndDocument,
        ])
        .unwrap();

        assert_eq!(
            doc,
            Node::document(vec![Node::section(
                1,
                vec![
                    Node::heading(1, vec![Node::text("Intro")]),
                    Node::paragraph(vec![
                        Node::text("Hello "),
                        Node::strong(vec![Node::text("world")]),
                    ]),
                ]
            )])
        );
    }

    #[test]
    fn test_merges_adjacent_text() {
        let doc = build(vec![
            Event::BeginDocument,
            Event::BeginParagraph,
            Event::Text("a".to_owned()),
            Event::Text("b".to_owned()),
            Event::LineBreak,
            Event::Text("c".to_owned()),
            Event::EndParagraph,
            Event::EndDocument,
        ])
        .unwrap();

        assert_eq!(
            doc.children[0].children,
            vec![Node::text("ab"), Node::line_break(), Node::text("c")]
        );
    }

    #[test]
    fn test_resolved_link() {
        let doc = build(vec![
            Event::BeginDocument,
            Event::BeginLink {
                target: "https://example.com".to_owned(),
            },
            Event::Text("site".to_owned()),
            Event::EndLink,
            Event::EndDocument,
        ])
        .unwrap();

        assert_eq!(
            doc.children,
            vec![Node::link(
                LinkTarget::url("https://example.com"),
                vec![Node::text("site")]
            )]
        );
    }

    #[test]
    fn test_unresolved_link_becomes_broken_link_in_place() {
        let mut builder = TreeBuilder::new(Arc::new(PageSetLinkResolver::new(["Known"])));
        let events = vec![
            Event::BeginDocument,
            Event::BeginParagraph,
            Event::Text("before ".to_owned()),
            Event::BeginLink {
                target: "Missing".to_owned(),
            },
            Event::Text("label".to_owned()),
            Event::EndLink,
            Event::Text(" after".to_owned()),
            Event::EndParagraph,
            Event::EndDocument,
        ];
        for event in events {
            builder.on_event(event).unwrap();
        }
        let doc = builder.finish().unwrap();

        assert_eq!(
            doc.children[0].children,
            vec![
                Node::text("before "),
                Node::broken_link("Missing", vec![Node::text("label")]),
                Node::text(" after"),
            ]
        );
    }

    #[test]
    fn test_unclosed_element_fails_finish() {
        let err = build(vec![Event::BeginDocument, Event::BeginParagraph]).unwrap_err();
        assert_eq!(err, StructuralError::Unclosed("paragraph"));
    }

    #[test]
    fn test_missing_end_document_fails_finish() {
        let err = build(vec![Event::BeginDocument]).unwrap_err();
        assert_eq!(err, StructuralError::Unclosed("document"));
    }

    #[test]
    fn test_empty_stream_fails_finish() {
        assert_eq!(build(Vec::new()).unwrap_err(), StructuralError::Empty);
    }

    #[test]
    fn test_mismatched_end() {
        let err = build(vec![
            Event::BeginDocument,
            Event::BeginParagraph,
            Event::EndHeading,
        ])
        .unwrap_err();
        assert_eq!(
            err,
            StructuralError::Mismatched {
                open: "paragraph",
                found: "end heading",
            }
        );
    }

    #[test]
    fn test_end_without_begin_cannot_pop_root() {
        let err = build(vec![Event::BeginDocument, Event::EndParagraph]).unwrap_err();
        assert_eq!(
            err,
            StructuralError::Mismatched {
                open: "document",
                found: "end paragraph",
            }
        );
    }

    #[test]
    fn test_events_outside_document() {
        let err = build(vec![Event::Text("x".to_owned())]).unwrap_err();
        assert_eq!(err, StructuralError::BeforeBegin("text"));

        let err = build(vec![
            Event::BeginDocument,
            Event::EndDocument,
            Event::BeginParagraph,
        ])
        .unwrap_err();
        assert_eq!(err, StructuralError::AfterEnd("begin paragraph"));
    }

    #[test]
    fn test_end_document_with_open_children() {
        let err = build(vec![
            Event::BeginDocument,
            Event::BeginList { ordered: false },
            Event::EndDocument,
        ])
        .unwrap_err();
        assert_eq!(
            err,
            StructuralError::Mismatched {
                open: "list",
                found: "end document",
            }
        );
    }
}
