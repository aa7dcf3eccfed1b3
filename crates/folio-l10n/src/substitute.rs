//! Placeholder substitution.

use folio_tree::{Node, NodeKind};

/// A value bound to a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parameter {
    /// Inserted as a single text node.
    Text(String),
    /// Inserted as a subtree.
    ///
    /// A `Document` or `Fragment` root is spliced in by its children, and a
    /// lone paragraph is further unwrapped so that a parsed inline snippet
    /// lands inline.
    Tree(Node),
}

impl From<&str> for Parameter {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Parameter {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Node> for Parameter {
    fn from(value: Node) -> Self {
        Self::Tree(value)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Parameter {
                fn from(value: $ty) -> Self {
                    Self::Text(value.to_string())
                }
            }
        )*
    };
}

impl_from_integer!(i32, i64, u32, u64, usize);

impl Parameter {
    /// Nodes that replace a placeholder.
    fn to_nodes(&self) -> Vec<Node> {
        match self {
            Self::Text(text) => vec![Node::text(text.clone())],
            Self::Tree(tree) if tree.kind.is_root() => match tree.children.as_slice() {
                [only] if only.kind == NodeKind::Paragraph => only.children.clone(),
                children => children.to_vec(),
            },
            Self::Tree(tree) => vec![tree.clone()],
        }
    }
}

/// Build a fresh tree from `template` with each `{n}` placeholder replaced
/// by `params[n]`.
///
/// Placeholders without a matching parameter become empty text and log a
/// warning. Surplus parameters are ignored. The template is not modified,
/// so one template can be rendered concurrently with different parameters.
#[must_use]
pub fn substitute(template: &Node, params: &[Parameter]) -> Node {
    template.rewrite(&mut |node| match node.kind {
        NodeKind::Placeholder { index } => Some(match params.get(index) {
            Some(param) => param.to_nodes(),
            None => {
                tracing::warn!(index, provided = params.len(), "Placeholder has no matching parameter");
                vec![Node::text("")]
            }
        }),
        _ => None,
    })
}
