//! Document tree nodes.

/// What a link points at once it has been validated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LinkKind {
    /// Absolute URL with a scheme (`https://...`).
    Url,
    /// E-mail address (`mailto:` prefix stripped).
    Mail,
    /// Reference to another page of the same wiki.
    Page,
}

/// A validated link target, produced by a link resolver.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkTarget {
    /// Target category.
    pub kind: LinkKind,
    /// Normalized reference (URL, address or page name).
    pub reference: String,
}

impl LinkTarget {
    /// Link to an absolute URL.
    #[must_use]
    pub fn url(reference: impl Into<String>) -> Self {
        Self {
            kind: LinkKind::Url,
            reference: reference.into(),
        }
    }

    /// Link to an e-mail address.
    #[must_use]
    pub fn mail(reference: impl Into<String>) -> Self {
        Self {
            kind: LinkKind::Mail,
            reference: reference.into(),
        }
    }

    /// Link to a wiki page.
    #[must_use]
    pub fn page(reference: impl Into<String>) -> Self {
        Self {
            kind: LinkKind::Page,
            reference: reference.into(),
        }
    }
}

/// Node kind with its kind-specific payload.
///
/// New kinds may be added; renderers that meet a kind they do not know must
/// report it instead of skipping it silently.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[non_exhaustive]
pub enum NodeKind {
    /// Root of a whole parsed document.
    Document,
    /// Synthetic root standing in for a document (translation templates).
    Fragment,
    /// Section grouping a heading and the content that follows it.
    Section { level: u8 },
    /// Heading of level 1 to 6.
    Heading { level: u8 },
    /// Paragraph.
    Paragraph,
    /// Ordered or bulleted list.
    List { ordered: bool },
    /// Item of a list.
    ListItem,
    /// Link whose children are the display label.
    Link { target: LinkTarget },
    /// Link whose target could not be resolved; children are the label.
    BrokenLink { raw: String },
    /// Emphasized (italic) inline content.
    Emphasis,
    /// Strong (bold) inline content.
    Strong,
    /// Inline monospace code.
    Code(String),
    /// Run of plain text.
    Text(String),
    /// Translation parameter slot, zero-based.
    Placeholder { index: usize },
    /// Forced line break.
    LineBreak,
    /// Horizontal rule.
    HorizontalRule,
    /// Syntax-specific construct kept opaque (e.g. a wiki macro call).
    Macro {
        name: String,
        params: Vec<(String, String)>,
        content: Option<String>,
    },
}

impl NodeKind {
    /// Short lowercase name of the kind, stable across versions.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Fragment => "fragment",
            Self::Section { .. } => "section",
            Self::Heading { .. } => "heading",
            Self::Paragraph => "paragraph",
            Self::List { .. } => "list",
            Self::ListItem => "list_item",
            Self::Link { .. } => "link",
            Self::BrokenLink { .. } => "broken_link",
            Self::Emphasis => "emphasis",
            Self::Strong => "strong",
            Self::Code(_) => "code",
            Self::Text(_) => "text",
            Self::Placeholder { .. } => "placeholder",
            Self::LineBreak => "line_break",
            Self::HorizontalRule => "horizontal_rule",
            Self::Macro { .. } => "macro",
        }
    }

    /// Whether nodes of this kind never have children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            Self::Code(_)
                | Self::Text(_)
                | Self::Placeholder { .. }
                | Self::LineBreak
                | Self::HorizontalRule
                | Self::Macro { .. }
        )
    }

    /// Whether this kind is a tree root (`Document` or `Fragment`).
    #[must_use]
    pub fn is_root(&self) -> bool {
        matches!(self, Self::Document | Self::Fragment)
    }
}

/// A node of the document tree.
///
/// Children are stored in reading order. Structural equality (`==`) compares
/// kinds, payloads and children recursively.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    /// Kind and payload.
    pub kind: NodeKind,
    /// Ordered children; always empty for leaf kinds.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub children: Vec<Node>,
}

impl Node {
    /// Create a node with the given children.
    ///
    /// Children passed to a leaf kind are dropped.
    #[must_use]
    pub fn new(kind: NodeKind, children: Vec<Node>) -> Self {
        let children = if kind.is_leaf() { Vec::new() } else { children };
        Self { kind, children }
    }

    /// Create a childless node.
    #[must_use]
    pub fn leaf(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn document(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Document, children)
    }

    #[must_use]
    pub fn fragment(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Fragment, children)
    }

    #[must_use]
    pub fn section(level: u8, children: Vec<Node>) -> Self {
        Self::new(NodeKind::Section { level }, children)
    }

    #[must_use]
    pub fn heading(level: u8, children: Vec<Node>) -> Self {
        Self::new(NodeKind::Heading { level }, children)
    }

    #[must_use]
    pub fn paragraph(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Paragraph, children)
    }

    #[must_use]
    pub fn list(ordered: bool, items: Vec<Node>) -> Self {
        Self::new(NodeKind::List { ordered }, items)
    }

    #[must_use]
    pub fn list_item(children: Vec<Node>) -> Self {
        Self::new(NodeKind::ListItem, children)
    }

    #[must_use]
    pub fn link(target: LinkTarget, label: Vec<Node>) -> Self {
        Self::new(NodeKind::Link { target }, label)
    }

    #[must_use]
    pub fn broken_link(raw: impl Into<String>, label: Vec<Node>) -> Self {
        Self::new(NodeKind::BrokenLink { raw: raw.into() }, label)
    }

    #[must_use]
    pub fn emphasis(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Emphasis, children)
    }

    #[must_use]
    pub fn strong(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Strong, children)
    }

    #[must_use]
    pub fn code(code: impl Into<String>) -> Self {
        Self::leaf(NodeKind::Code(code.into()))
    }

    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::leaf(NodeKind::Text(text.into()))
    }

    #[must_use]
    pub fn placeholder(index: usize) -> Self {
        Self::leaf(NodeKind::Placeholder { index })
    }

    #[must_use]
    pub fn line_break() -> Self {
        Self::leaf(NodeKind::LineBreak)
    }

    #[must_use]
    pub fn horizontal_rule() -> Self {
        Self::leaf(NodeKind::HorizontalRule)
    }

    #[must_use]
    pub fn macro_call(
        name: impl Into<String>,
        params: Vec<(String, String)>,
        content: Option<String>,
    ) -> Self {
        Self::leaf(NodeKind::Macro {
            name: name.into(),
            params,
            content,
        })
    }

    /// Whether this node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Depth-first pre-order traversal, starting with `self`.
    ///
    /// Children are visited in their stored order, so the traversal is
    /// deterministic and follows reading order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }

    /// All nodes of the subtree matching `predicate`, in pre-order.
    pub fn find_all<P>(&self, mut predicate: P) -> Vec<&Node>
    where
        P: FnMut(&Node) -> bool,
    {
        self.iter().filter(|n| predicate(n)).collect()
    }

    /// Concatenated text of every `Text` and `Code` node of the subtree.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for node in self.iter() {
            match &node.kind {
                NodeKind::Text(text) | NodeKind::Code(text) => out.push_str(text),
                _ => {}
            }
        }
        out
    }

    /// Build a fresh copy of this tree with some descendants replaced.
    ///
    /// `replace` is called for every descendant in pre-order. Returning
    /// `Some(nodes)` substitutes the descendant with `nodes` (zero or more
    /// siblings, not visited again); returning `None` keeps it and descends
    /// into its children. The root itself is always kept and `self` is left
    /// untouched.
    #[must_use]
    pub fn rewrite<F>(&self, replace: &mut F) -> Node
    where
        F: FnMut(&Node) -> Option<Vec<Node>>,
    {
        let mut children = Vec::with_capacity(self.children.len());
        for child in &self.children {
            match replace(child) {
                Some(nodes) => children.extend(nodes),
                None => children.push(child.rewrite(replace)),
            }
        }
        Node {
            kind: self.kind.clone(),
            children,
        }
    }
}

/// Pre-order iterator over a subtree, see [`Node::iter`].
pub struct Iter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

impl<'a> IntoIterator for &'a Node {
    type Item = &'a Node;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
