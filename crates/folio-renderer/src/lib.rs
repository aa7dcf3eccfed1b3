//! Trait-based renderers serializing the Folio document tree.
//!
//! A [`Renderer`] writes a [`Node`](folio_tree::Node) tree as text of one
//! target syntax. Renderers are looked up by exact
//! [`SyntaxId`](folio_tree::SyntaxId) in a [`RendererRegistry`]; there is no
//! fallback to a "close" syntax.
//!
//! # Built-in renderers
//!
//! | Syntax       | Renderer            | Unknown constructs            | Round-trip |
//! |--------------|---------------------|-------------------------------|------------|
//! | `plain/1.0`  | [`PlainRenderer`]   | pass-through as plain text    | no (lossy) |
//! | `xwiki/2.1`  | [`WikiRenderer`]    | error                         | yes        |
//! | `html/5.0`   | [`HtmlRenderer`]    | error                         | no parser  |
//! | `event/1.0`  | [`EventRenderer`]   | listed by kind name           | no parser  |
//!
//! # Example
//!
//! ```
//! use folio_renderer::RendererRegistry;
//! use folio_tree::{Node, SyntaxId};
//!
//! let registry = RendererRegistry::with_defaults();
//! let doc = Node::document(vec![Node::paragraph(vec![Node::text("Hi & bye")])]);
//!
//! let html = registry.render(&SyntaxId::html(), &doc).unwrap();
//! assert_eq!(html, "<p>Hi &amp; bye</p>");
//! ```

mod event;
mod html;
mod plain;
mod registry;
mod renderer;
mod wiki;

pub use event::EventRenderer;
pub use html::{HtmlRenderer, escape_html};
pub use plain::PlainRenderer;
pub use registry::{RegistryError, RendererRegistry};
pub use renderer::{RenderError, Renderer};
pub use wiki::WikiRenderer;
