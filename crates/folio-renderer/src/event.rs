//! Structural dump renderer.

use std::fmt::Write;

use folio_tree::{LinkKind, Node, NodeKind, SyntaxId};

use crate::renderer::{RenderError, Renderer};

/// Renderer for `event/1.0`.
///
/// Writes one line per node in pre-order, indented two spaces per level,
/// naming the node kind and its attributes. Useful for inspecting what a
/// parser produced. Never fails.
///
/// ```text
/// document
///   heading level=2
///     text "Title"
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct EventRenderer;

impl Renderer for EventRenderer {
    fn syntax(&self) -> SyntaxId {
        SyntaxId::event()
    }

    fn render(&self, tree: &Node, out: &mut String) -> Result<(), RenderError> {
        write_node(tree, 0, out);
        Ok(())
    }
}

fn write_node(node: &Node, depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push_str(node.kind.name());
    // Writing into a String cannot fail.
    let _ = match &node.kind {
        NodeKind::Section { level } | NodeKind::Heading { level } => write!(out, " level={level}"),
        NodeKind::List { ordered } => write!(out, " ordered={ordered}"),
        NodeKind::Link { target } => {
            let kind = match target.kind {
                LinkKind::Url => "url",
                LinkKind::Mail => "mail",
                LinkKind::Page => "page",
            };
            write!(out, " {kind}={:?}", target.reference)
        }
        NodeKind::BrokenLink { raw } => write!(out, " raw={raw:?}"),
        NodeKind::Text(text) | NodeKind::Code(text) => write!(out, " {text:?}"),
        NodeKind::Placeholder { index } => write!(out, " index={index}"),
        NodeKind::Macro {
            name,
            params,
            content,
        } => {
            let _ = write!(out, " name={name:?}");
            for (key, value) in params {
                let _ = write!(out, " {key}={value:?}");
            }
            match content {
                Some(content) => write!(out, " content={content:?}"),
                None => Ok(()),
            }
        }
        _ => Ok(()),
    };
    out.push('\n');
    for child in &node.children {
        write_node(child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use folio_tree::LinkTarget;
    use pretty_assertions::assert_eq;

    use super::*;

    fn render(tree: &Node) -> String {
        let mut out = String::new();
        EventRenderer.render(tree, &mut out).unwrap();
        out
    }

    #[test]
    fn test_dump() {
        let tree = Node::document(vec![
            Node::heading(2, vec![Node::text("Title")]),
            Node::paragraph(vec![
                Node::link(LinkTarget::page("Home"), vec![Node::text("home")]),
                Node::broken_link("{{bad}}", vec![]),
                Node::placeholder(1),
            ]),
            Node::macro_call(
                "code",
                vec![("language".to_owned(), "rust".to_owned())],
                Some("x".to_owned()),
            ),
        ]);
        assert_eq!(
            render(&tree),
            "document\n\
             \x20 heading level=2\n\
             \x20   text \"Title\"\n\
             \x20 paragraph\n\
             \x20   link page=\"Home\"\n\
             \x20     text \"home\"\n\
             \x20   broken_link raw=\"{{bad}}\"\n\
             \x20   placeholder index=1\n\
             \x20 macro name=\"code\" language=\"rust\" content=\"x\"\n"
        );
    }

    #[test]
    fn test_is_deterministic() {
        let tree = Node::fragment(vec![Node::list(
            true,
            vec![Node::list_item(vec![Node::code("a")])],
        )]);
        assert_eq!(render(&tree), render(&tree));
        assert_eq!(
            render(&tree),
            "fragment\n  list ordered=true\n    list_item\n      code \"a\"\n"
        );
    }
}
