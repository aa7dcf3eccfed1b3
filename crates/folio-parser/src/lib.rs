//! Event-driven parsing of wiki syntaxes into the Folio document tree.
//!
//! Parsing is split in two layers:
//!
//! - A [`Tokenizer`] knows one concrete syntax and reports what it reads as a
//!   stream of structural [`Event`]s to a [`Listener`].
//! - The [`TreeBuilder`] is the listener that turns those events into a
//!   [`folio_tree::Node`] tree, resolving link targets through a
//!   [`LinkResolver`].
//!
//! The [`Parser`] façade ties both together: it picks the tokenizer registered
//! for a [`SyntaxId`](folio_tree::SyntaxId), feeds a fresh builder and returns
//! the finished tree.
//!
//! # Built-in syntaxes
//!
//! - `plain/1.0`: [`PlainTokenizer`]
//! - `xwiki/2.1`: [`WikiTokenizer`]
//! - `markdown/1.2`: [`MarkdownTokenizer`] (backed by `pulldown-cmark`)
//!
//! # Example
//!
//! ```
//! use folio_parser::Parser;
//! use folio_tree::{NodeKind, SyntaxId};
//!
//! let parser = Parser::with_defaults();
//! let doc = parser.parse("== Title ==\nBody", &SyntaxId::wiki()).unwrap();
//!
//! assert_eq!(doc.children.len(), 2);
//! assert_eq!(doc.children[0].kind, NodeKind::Heading { level: 2 });
//! assert_eq!(doc.children[1].text_content(), "Body");
//! ```

mod builder;
mod error;
mod event;
mod link;
mod parser;
mod tokenizer;

pub use builder::TreeBuilder;
pub use error::{ParseError, StructuralError, TokenizeError};
pub use event::{Event, Listener};
pub use link::{DefaultLinkResolver, LinkResolver, PageSetLinkResolver, Unresolved};
pub use parser::{Parser, ParserBuilder};
pub use tokenizer::{MarkdownTokenizer, PlainTokenizer, Tokenizer, WikiTokenizer};
