//! Caller-facing localization service bound to a locale.

use std::sync::Arc;

use folio_tree::SyntaxId;

use crate::entry::TranslationEntry;
use crate::locale::Locale;
use crate::localizer::Localizer;
use crate::substitute::Parameter;

/// Localization entry point for callers that render on behalf of a user.
///
/// The service carries the locale explicitly instead of reading it from
/// ambient request state. It is cheap to clone, and
/// [`with_locale`](Self::with_locale) re-binds it for another user.
///
/// Unlike [`Localizer::render`], rendering methods never return errors:
/// failures are logged at `error` level and reported as `None`, or degrade
/// to the key for [`render_plain`](Self::render_plain).
#[derive(Clone)]
pub struct LocalizationService {
    localizer: Arc<Localizer>,
    locale: Locale,
}

impl LocalizationService {
    #[must_use]
    pub fn new(localizer: Arc<Localizer>, locale: Locale) -> Self {
        Self { localizer, locale }
    }

    /// The same service bound to `locale`.
    #[must_use]
    pub fn with_locale(&self, locale: Locale) -> Self {
        Self {
            localizer: Arc::clone(&self.localizer),
            locale,
        }
    }

    #[must_use]
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Translation entry for `key`, if any locale of the chain defines it.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Arc<TranslationEntry>> {
        self.localizer.resolve(key, &self.locale)
    }

    /// Render `key` as plain text without parameters.
    #[must_use]
    pub fn render(&self, key: &str) -> Option<String> {
        self.render_in(key, &SyntaxId::plain(), &[])
    }

    /// Render `key` as plain text with `params`.
    #[must_use]
    pub fn render_with(&self, key: &str, params: &[Parameter]) -> Option<String> {
        self.render_in(key, &SyntaxId::plain(), params)
    }

    /// Render `key` as `syntax` with `params`.
    ///
    /// Returns the key when no translation exists, and `None` when the
    /// translation exists but cannot be rendered as `syntax`.
    #[must_use]
    pub fn render_in(&self, key: &str, syntax: &SyntaxId, params: &[Parameter]) -> Option<String> {
        match self.localizer.render(key, &self.locale, syntax, params) {
            Ok(text) => Some(text),
            Err(err) => {
                tracing::error!(key, locale = %self.locale, %syntax, error = %err, "Failed to render translation");
                None
            }
        }
    }

    /// Render `key` as plain text, falling back to the key on any failure.
    ///
    /// Meant for producers of notifications and feeds that must always emit
    /// some text.
    #[must_use]
    pub fn render_plain(&self, key: &str, params: &[Parameter]) -> String {
        self.render_with(key, params).unwrap_or_else(|| key.to_owned())
    }
}

impl std::fmt::Debug for LocalizationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalizationService")
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use folio_renderer::{RenderError, Renderer, RendererRegistry};
    use folio_tree::Node;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::bundle::{Bundle, MemoryBundle};
    use crate::resolver::TranslationResolver;

    /// Plain text renderer that rejects every tree.
    struct BrokenPlain;

    impl Renderer for BrokenPlain {
        fn syntax(&self) -> SyntaxId {
            SyntaxId::plain()
        }

        fn render(&self, tree: &Node, _out: &mut String) -> Result<(), RenderError> {
            Err(RenderError::UnsupportedNode {
                syntax: SyntaxId::plain(),
                construct: format!("{} nodes", tree.kind.name()),
            })
        }
    }

    fn service_with(renderers: RendererRegistry) -> LocalizationService {
        let bundle = Arc::new(MemoryBundle::new());
        bundle.insert(&"en".parse().unwrap(), "greeting", "Hello, {0}!").unwrap();
        bundle.insert(&"de".parse().unwrap(), "greeting", "Hallo, {0}!").unwrap();
        bundle
            .insert(&"en".parse().unwrap(), "activity.comment", "{0} commented on {1}")
            .unwrap();
        let localizer = Localizer::new(
            TranslationResolver::new(bundle as Arc<dyn Bundle>),
            Arc::new(renderers),
        );
        LocalizationService::new(Arc::new(localizer), "en_US".parse().unwrap())
    }

    fn service() -> LocalizationService {
        service_with(RendererRegistry::with_defaults())
    }

    #[test]
    fn test_render_with_params() {
        let service = service();
        assert_eq!(
            service.render_with("greeting", &["Ada".into()]).as_deref(),
            Some("Hello, Ada!")
        );
        assert_eq!(
            service.render_plain("activity.comment", &["Ada".into(), "Main.WebHome".into()]),
            "Ada commented on Main.WebHome"
        );
    }

    #[test]
    fn test_with_locale_rebinds() {
        let german = service().with_locale("de_AT".parse().unwrap());
        assert_eq!(german.locale().to_string(), "de_AT");
        assert_eq!(german.render_plain("greeting", &["Ada".into()]), "Hallo, Ada!");
    }

    #[test]
    fn test_get() {
        let service = service();
        let entry = service.get("greeting").unwrap();
        assert_eq!(entry.locale().to_string(), "en");
        assert!(service.get("missing").is_none());
    }

    #[test]
    fn test_missing_key_renders_key() {
        assert_eq!(service().render("missing.key").as_deref(), Some("missing.key"));
    }

    #[test]
    fn test_render_failure_is_none() {
        let service = service();
        let syntax: SyntaxId = "html/9.9".parse().unwrap();
        assert_eq!(service.render_in("greeting", &syntax, &["Ada".into()]), None);
    }

    #[test]
    fn test_render_plain_degrades_to_key() {
        let registry = RendererRegistry::new();
        registry.register(BrokenPlain);
        let service = service_with(registry);

        assert_eq!(service.render_with("greeting", &["Ada".into()]), None);
        assert_eq!(service.render_plain("greeting", &["Ada".into()]), "greeting");
    }
}
