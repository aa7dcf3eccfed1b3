//! Renderer registry keyed by syntax identifier.
//!
//! # Thread Safety
//!
//! - Uses internal `RwLock<Arc<RendererMap>>` for the current table snapshot
//! - Uses `Mutex<()>` for serializing registrations
//!
//! Lookups clone the `Arc` under a short read lock and never wait for a
//! registration to build its new table. Registrations copy the current table,
//! insert, and swap the snapshot pointer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use folio_tree::{Node, SyntaxId};

use crate::event::EventRenderer;
use crate::html::HtmlRenderer;
use crate::plain::PlainRenderer;
use crate::renderer::{RenderError, Renderer};
use crate::wiki::WikiRenderer;

type RendererMap = HashMap<SyntaxId, Arc<dyn Renderer>>;

/// Error returned by registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// No renderer is registered for the requested syntax.
    #[error("No renderer registered for syntax '{0}'")]
    NotFound(SyntaxId),
    /// The renderer rejected the tree.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Table of renderers, looked up by exact syntax identifier.
pub struct RendererRegistry {
    /// Mutex for serializing registrations.
    update_lock: Mutex<()>,
    /// Current table snapshot.
    renderers: RwLock<Arc<RendererMap>>,
}

impl RendererRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            update_lock: Mutex::new(()),
            renderers: RwLock::new(Arc::new(HashMap::new())),
        }
    }

    /// Registry holding the plain, wiki, HTML and event renderers.
    #[must_use]
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register(PlainRenderer);
        registry.register(WikiRenderer);
        registry.register(HtmlRenderer);
        registry.register(EventRenderer);
        registry
    }

    /// Register `renderer` under its own syntax.
    ///
    /// Returns the renderer previously registered for that syntax, if any.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    pub fn register<R: Renderer + 'static>(&self, renderer: R) -> Option<Arc<dyn Renderer>> {
        self.register_shared(Arc::new(renderer))
    }

    /// Register an already shared renderer under its own syntax.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    pub fn register_shared(&self, renderer: Arc<dyn Renderer>) -> Option<Arc<dyn Renderer>> {
        let _guard = self.update_lock.lock().unwrap();
        let syntax = renderer.syntax();

        let mut next = RendererMap::clone(&self.snapshot());
        let previous = next.insert(syntax.clone(), renderer);
        *self.renderers.write().unwrap() = Arc::new(next);

        tracing::debug!(%syntax, replaced = previous.is_some(), "Registered renderer");
        previous
    }

    /// Renderer registered for exactly `syntax`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if none is registered. Other
    /// versions of the same family are not considered.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    pub fn lookup(&self, syntax: &SyntaxId) -> Result<Arc<dyn Renderer>, RegistryError> {
        self.snapshot()
            .get(syntax)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(syntax.clone()))
    }

    /// Whether a renderer is registered for `syntax`.
    #[must_use]
    pub fn contains(&self, syntax: &SyntaxId) -> bool {
        self.snapshot().contains_key(syntax)
    }

    /// Registered syntaxes, sorted.
    #[must_use]
    pub fn syntaxes(&self) -> Vec<SyntaxId> {
        let mut ids: Vec<SyntaxId> = self.snapshot().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Render `tree` with the renderer for `syntax`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] for unknown syntaxes and
    /// [`RegistryError::Render`] if the renderer fails.
    pub fn render(&self, syntax: &SyntaxId, tree: &Node) -> Result<String, RegistryError> {
        let renderer = self.lookup(syntax)?;
        let mut out = String::new();
        renderer.render(tree, &mut out)?;
        Ok(out)
    }

    /// Current table snapshot.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    fn snapshot(&self) -> Arc<RendererMap> {
        Arc::clone(&self.renderers.read().unwrap())
    }
}

impl Default for RendererRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RendererRegistry")
            .field("syntaxes", &self.syntaxes())
            .finish_non_exhaustive()
    }
}
