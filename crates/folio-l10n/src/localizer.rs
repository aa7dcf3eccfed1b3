//! Parameterized rendering of translations.

use std::sync::Arc;

use folio_renderer::{RegistryError, RenderError, RendererRegistry};
use folio_tree::SyntaxId;

use crate::entry::TranslationEntry;
use crate::locale::Locale;
use crate::resolver::TranslationResolver;
use crate::substitute::{Parameter, substitute};

/// Error returned when a resolved translation cannot be rendered.
///
/// A missing translation is not an error; see [`Localizer::render`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum L10nError {
    /// No renderer is registered for the requested output syntax.
    #[error("No renderer registered for syntax '{0}'")]
    RendererNotFound(SyntaxId),
    /// The renderer rejected the substituted tree.
    #[error("Failed to render '{key}' as {syntax}")]
    Render {
        key: String,
        syntax: SyntaxId,
        #[source]
        source: RenderError,
    },
}

/// Resolves translations and renders them with parameters.
pub struct Localizer {
    resolver: TranslationResolver,
    renderers: Arc<RendererRegistry>,
}

impl Localizer {
    #[must_use]
    pub fn new(resolver: TranslationResolver, renderers: Arc<RendererRegistry>) -> Self {
        Self { resolver, renderers }
    }

    #[must_use]
    pub fn resolver(&self) -> &TranslationResolver {
        &self.resolver
    }

    #[must_use]
    pub fn renderers(&self) -> &Arc<RendererRegistry> {
        &self.renderers
    }

    /// Entry for `key` in `locale` or its closest fallback.
    #[must_use]
    pub fn resolve(&self, key: &str, locale: &Locale) -> Option<Arc<TranslationEntry>> {
        self.resolver.resolve(key, locale)
    }

    /// Render the translation of `key` for `locale` as `syntax`.
    ///
    /// When no locale of the fallback chain defines `key`, the key itself is
    /// returned so that callers always have something to display.
    ///
    /// # Errors
    ///
    /// - [`L10nError::RendererNotFound`] if no renderer is registered for
    ///   exactly `syntax`
    /// - [`L10nError::Render`] if the renderer rejects the tree
    pub fn render(
        &self,
        key: &str,
        locale: &Locale,
        syntax: &SyntaxId,
        params: &[Parameter],
    ) -> Result<String, L10nError> {
        let Some(entry) = self.resolve(key, locale) else {
            tracing::debug!(key, %locale, "No translation, rendering the key");
            return Ok(key.to_owned());
        };

        let tree = substitute(entry.template(), params);
        let renderer = self.renderers.lookup(syntax).map_err(|err| match err {
            RegistryError::NotFound(syntax) => L10nError::RendererNotFound(syntax),
            RegistryError::Render(source) => L10nError::Render {
                key: key.to_owned(),
                syntax: syntax.clone(),
                source,
            },
        })?;

        let mut out = String::new();
        renderer
            .render(&tree, &mut out)
            .map_err(|source| L10nError::Render {
                key: key.to_owned(),
                syntax: syntax.clone(),
                source,
            })?;
        Ok(out)
    }
}
