//! Translation resolution and parameterized rendering.
//!
//! Messages are parsed once into document-tree templates
//! ([`TranslationEntry`]) and stored in a [`Bundle`]. A
//! [`TranslationResolver`] finds the entry for a key by walking the locale
//! fallback chain, and a [`Localizer`] substitutes parameters into the
//! template and renders it with a renderer from the registry.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use folio_l10n::{Bundle, Locale, Localizer, MemoryBundle, TranslationResolver};
//! use folio_renderer::RendererRegistry;
//! use folio_tree::SyntaxId;
//!
//! let bundle = Arc::new(MemoryBundle::new());
//! let en: Locale = "en".parse().unwrap();
//! bundle.insert(&en, "greeting", "Hello, {0}!").unwrap();
//!
//! let localizer = Localizer::new(
//!     TranslationResolver::new(bundle as Arc<dyn Bundle>),
//!     Arc::new(RendererRegistry::with_defaults()),
//! );
//!
//! let us: Locale = "en_US".parse().unwrap();
//! let text = localizer
//!     .render("greeting", &us, &SyntaxId::plain(), &["Ada".into()])
//!     .unwrap();
//! assert_eq!(text, "Hello, Ada!");
//!
//! // Missing translations render as the key.
//! let text = localizer.render("missing.key", &us, &SyntaxId::plain(), &[]).unwrap();
//! assert_eq!(text, "missing.key");
//! ```

mod bundle;
mod entry;
mod locale;
mod localizer;
mod resolver;
mod service;
mod substitute;

pub use bundle::{Bundle, BundleSet, MemoryBundle};
pub use entry::TranslationEntry;
pub use locale::{Locale, LocaleError};
pub use localizer::{L10nError, Localizer};
pub use resolver::{CacheStats, TranslationResolver};
pub use service::LocalizationService;
pub use substitute::{Parameter, substitute};
