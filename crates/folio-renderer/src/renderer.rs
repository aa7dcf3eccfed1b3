//! Renderer contract.

use folio_tree::{Node, NodeKind, SyntaxId};

/// Error raised while rendering a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// The tree contains a construct this renderer cannot express.
    #[error("{syntax} renderer does not support {construct}")]
    UnsupportedNode {
        /// Syntax of the renderer.
        syntax: SyntaxId,
        /// Description of the offending construct (e.g. `placeholder`).
        construct: String,
    },
}

impl RenderError {
    pub(crate) fn unsupported(syntax: SyntaxId, kind: &NodeKind) -> Self {
        let construct = match kind {
            NodeKind::Macro { name, .. } => format!("macro '{name}'"),
            other => format!("{} nodes", other.name()),
        };
        Self::UnsupportedNode { syntax, construct }
    }
}

/// Serializer of document trees into one target syntax.
///
/// Implementations must be deterministic: the same tree always renders to the
/// same text. Each implementation documents what it does with constructs it
/// cannot express; the default is to fail with
/// [`RenderError::UnsupportedNode`].
pub trait Renderer: Send + Sync {
    /// Syntax this renderer produces.
    fn syntax(&self) -> SyntaxId;

    /// Append the serialized form of `tree` to `out`.
    ///
    /// On error, `out` may contain partial output.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the tree contains unsupported constructs.
    fn render(&self, tree: &Node, out: &mut String) -> Result<(), RenderError>;
}

/// Whether a node kind is block-level (rendered on its own lines).
pub(crate) fn is_block(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Document
            | NodeKind::Fragment
            | NodeKind::Section { .. }
            | NodeKind::Heading { .. }
            | NodeKind::Paragraph
            | NodeKind::List { .. }
            | NodeKind::ListItem
            | NodeKind::HorizontalRule
            | NodeKind::Macro { .. }
    )
}

/// Group a child sequence into blocks: block nodes stand alone, runs of
/// consecutive inline nodes form one implicit paragraph.
pub(crate) enum BlockRun<'a> {
    Block(&'a Node),
    Inline(&'a [Node]),
}

pub(crate) fn block_runs(children: &[Node]) -> Vec<BlockRun<'_>> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, child) in children.iter().enumerate() {
        if is_block(&child.kind) {
            if let Some(s) = start.take() {
                runs.push(BlockRun::Inline(&children[s..i]));
            }
            runs.push(BlockRun::Block(child));
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        runs.push(BlockRun::Inline(&children[s..]));
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_runs_group_inline_nodes() {
        let children = vec![
            Node::text("a"),
            Node::strong(vec![Node::text("b")]),
            Node::paragraph(vec![Node::text("c")]),
            Node::text("d"),
        ];
        let runs = block_runs(&children);
        assert_eq!(runs.len(), 3);
        assert!(matches!(runs[0], BlockRun::Inline(nodes) if nodes.len() == 2));
        assert!(matches!(runs[1], BlockRun::Block(_)));
        assert!(matches!(runs[2], BlockRun::Inline(nodes) if nodes.len() == 1));
    }

    #[test]
    fn test_unsupported_message() {
        let err = RenderError::unsupported(SyntaxId::html(), &NodeKind::Placeholder { index: 0 });
        assert_eq!(
            err.to_string(),
            "html/5.0 renderer does not support placeholder nodes"
        );
        let err = RenderError::unsupported(
            SyntaxId::html(),
            &NodeKind::Macro {
                name: "toc".to_owned(),
                params: Vec::new(),
                content: None,
            },
        );
        assert_eq!(err.to_string(), "html/5.0 renderer does not support macro 'toc'");
    }
}
