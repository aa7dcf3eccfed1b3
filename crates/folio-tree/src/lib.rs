//! Syntax-independent document tree for Folio.
//!
//! Every parser produces, and every renderer consumes, the same canonical
//! [`Node`] tree. Nothing in this crate knows about a concrete markup syntax;
//! syntaxes are only named, through [`SyntaxId`].
//!
//! # Ownership
//!
//! A [`Node`] owns its children by value. A node therefore has exactly one
//! parent and can never become its own descendant: trees are built bottom-up
//! and moved into their parent, and rewriting a tree (see
//! [`Node::rewrite`]) produces a fresh tree rather than relinking shared
//! nodes.
//!
//! # Example
//!
//! ```
//! use folio_tree::{Node, NodeKind};
//!
//! let doc = Node::document(vec![
//!     Node::heading(2, vec![Node::text("Title")]),
//!     Node::paragraph(vec![Node::text("Body")]),
//! ]);
//!
//! let kinds: Vec<&str> = doc.iter().map(|n| n.kind.name()).collect();
//! assert_eq!(kinds, ["document", "heading", "text", "paragraph", "text"]);
//! assert_eq!(doc.text_content(), "TitleBody");
//! assert!(matches!(doc.children[0].kind, NodeKind::Heading { level: 2 }));
//! ```

mod node;
mod syntax;

pub use node::{Iter, LinkKind, LinkTarget, Node, NodeKind};
pub use syntax::{SyntaxId, SyntaxIdError};
