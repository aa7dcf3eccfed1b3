//! Translation bundles.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use folio_parser::{ParseError, Parser};
use folio_tree::SyntaxId;

use crate::entry::TranslationEntry;
use crate::locale::Locale;

/// Source of translation entries.
///
/// Lookups are exact: a bundle answers for the locale it is asked about and
/// never falls back on its own. [`generation`](Bundle::generation) must
/// change whenever the bundle content changes, so that resolvers can drop
/// cached results.
pub trait Bundle: Send + Sync {
    /// Entry for `key` defined in exactly `locale`.
    fn lookup(&self, key: &str, locale: &Locale) -> Option<Arc<TranslationEntry>>;

    /// Content version; changes on every modification.
    fn generation(&self) -> u64;
}

type Messages = HashMap<Locale, HashMap<String, Arc<TranslationEntry>>>;

/// In-memory bundle of messages parsed on insertion.
///
/// Messages are parsed with the configured parser and syntax (`plain/1.0` by
/// default) when they are added, so lookups only hand out shared entries.
pub struct MemoryBundle {
    parser: Parser,
    syntax: SyntaxId,
    messages: RwLock<Messages>,
    generation: AtomicU64,
}

impl MemoryBundle {
    /// Empty bundle parsing messages as `plain/1.0`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_parser(Parser::with_defaults(), SyntaxId::plain())
    }

    /// Empty bundle parsing messages with `parser` as `syntax`.
    #[must_use]
    pub fn with_parser(parser: Parser, syntax: SyntaxId) -> Self {
        Self {
            parser,
            syntax,
            messages: RwLock::new(HashMap::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// Syntax messages are written in.
    #[must_use]
    pub fn syntax(&self) -> &SyntaxId {
        &self.syntax
    }

    /// Add or replace one message.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the message does not parse; the bundle is
    /// left unchanged.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    pub fn insert(&self, locale: &Locale, key: &str, message: &str) -> Result<(), ParseError> {
        let entry = self.parse(locale, key, message)?;
        self.messages
            .write()
            .unwrap()
            .entry(locale.clone())
            .or_default()
            .insert(key.to_owned(), entry);
        self.generation.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    /// Replace the whole content with `messages`.
    ///
    /// All messages are parsed before anything is replaced, so a failing
    /// message leaves the previous content in place.
    ///
    /// # Errors
    ///
    /// Returns the [`ParseError`] of the first message that does not parse.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    pub fn reload<I, K, M>(&self, messages: I) -> Result<(), ParseError>
    where
        I: IntoIterator<Item = (Locale, K, M)>,
        K: AsRef<str>,
        M: AsRef<str>,
    {
        let mut next = Messages::new();
        for (locale, key, message) in messages {
            let entry = self.parse(&locale, key.as_ref(), message.as_ref())?;
            next.entry(locale)
                .or_default()
                .insert(key.as_ref().to_owned(), entry);
        }

        let count: usize = next.values().map(HashMap::len).sum();
        *self.messages.write().unwrap() = next;
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!(count, generation, "Reloaded translation bundle");
        Ok(())
    }

    /// Number of messages across all locales.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.read().unwrap().values().map(HashMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn parse(&self, locale: &Locale, key: &str, message: &str) -> Result<Arc<TranslationEntry>, ParseError> {
        TranslationEntry::from_message(key, locale.clone(), message, &self.parser, &self.syntax).map(Arc::new)
    }
}

impl Default for MemoryBundle {
    fn default() -> Self {
        Self::new()
    }
}

impl Bundle for MemoryBundle {
    fn lookup(&self, key: &str, locale: &Locale) -> Option<Arc<TranslationEntry>> {
        self.messages
            .read()
            .unwrap()
            .get(locale)
            .and_then(|entries| entries.get(key))
            .cloned()
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

/// Several bundles queried in priority order.
///
/// The first bundle holding an entry wins. The generation is the sum of the
/// member generations, so it changes whenever any member changes.
#[derive(Default)]
pub struct BundleSet {
    bundles: Vec<Arc<dyn Bundle>>,
}

impl BundleSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bundle with lower priority than the ones already added.
    #[must_use]
    pub fn with(mut self, bundle: Arc<dyn Bundle>) -> Self {
        self.bundles.push(bundle);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}

impl Bundle for BundleSet {
    fn lookup(&self, key: &str, locale: &Locale) -> Option<Arc<TranslationEntry>> {
        self.bundles.iter().find_map(|bundle| bundle.lookup(key, locale))
    }

    fn generation(&self) -> u64 {
        self.bundles
            .iter()
            .fold(0, |sum, bundle| sum.wrapping_add(bundle.generation()))
    }
}
