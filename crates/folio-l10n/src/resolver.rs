//! Translation resolution with locale fallback and caching.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::bundle::Bundle;
use crate::entry::TranslationEntry;
use crate::locale::Locale;

type Resolved = Option<Arc<TranslationEntry>>;

/// Cached results, valid for one bundle generation.
#[derive(Default)]
struct ResolverCache {
    generation: u64,
    entries: HashMap<Locale, HashMap<String, Resolved>>,
}

impl ResolverCache {
    fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }
}

/// Cache counters reported by [`TranslationResolver::cache_stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Resolutions answered from the cache.
    pub hits: u64,
    /// Resolutions that walked the fallback chain.
    pub misses: u64,
    /// Cached `(key, locale)` results, misses included.
    pub entries: usize,
}

/// Finds the entry for a key by walking the locale fallback chain.
///
/// Results, including "no translation", are cached per `(key, locale)`.
/// The cache records the bundle generation it was filled under and is
/// dropped wholesale as soon as the bundle reports another one. There is no
/// time-based expiry.
pub struct TranslationResolver {
    bundle: Arc<dyn Bundle>,
    cache: Option<RwLock<ResolverCache>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl TranslationResolver {
    /// Resolver over `bundle` with caching enabled.
    #[must_use]
    pub fn new(bundle: Arc<dyn Bundle>) -> Self {
        Self {
            bundle,
            cache: Some(RwLock::new(ResolverCache::default())),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Enable or disable the result cache.
    #[must_use]
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache = enabled.then(|| RwLock::new(ResolverCache::default()));
        self
    }

    /// The bundle entries are looked up in.
    #[must_use]
    pub fn bundle(&self) -> &Arc<dyn Bundle> {
        &self.bundle
    }

    /// Entry for `key` in `locale` or the closest less specific locale.
    ///
    /// Returns `None` when no locale of the chain, root included, defines
    /// the key. A missing translation is not an error.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    pub fn resolve(&self, key: &str, locale: &Locale) -> Option<Arc<TranslationEntry>> {
        let Some(cache) = &self.cache else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return self.walk(key, locale);
        };

        let generation = self.bundle.generation();
        {
            let cache = cache.read().unwrap();
            if cache.generation == generation
                && let Some(resolved) = cache.entries.get(locale).and_then(|keys| keys.get(key))
            {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return resolved.clone();
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let resolved = self.walk(key, locale);

        let mut cache = cache.write().unwrap();
        if cache.generation != generation {
            tracing::debug!(
                dropped = cache.len(),
                from = cache.generation,
                to = generation,
                "Bundle changed, dropping translation cache"
            );
            cache.entries.clear();
            cache.generation = generation;
        }
        cache
            .entries
            .entry(locale.clone())
            .or_default()
            .insert(key.to_owned(), resolved.clone());
        resolved
    }

    /// Current cache counters.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self
                .cache
                .as_ref()
                .map_or(0, |cache| cache.read().unwrap().len()),
        }
    }

    /// Drop every cached result.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.write().unwrap().entries.clear();
        }
    }

    fn walk(&self, key: &str, locale: &Locale) -> Resolved {
        locale
            .fallback_chain()
            .iter()
            .find_map(|candidate| self.bundle.lookup(key, candidate))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::bundle::MemoryBundle;

    fn locale(tag: &str) -> Locale {
        tag.parse().unwrap()
    }

    fn setup() -> (Arc<MemoryBundle>, TranslationResolver) {
        let bundle = Arc::new(MemoryBundle::new());
        bundle.insert(&Locale::ROOT, "greeting", "Hi").unwrap();
        bundle.insert(&locale("en"), "greeting", "Hello").unwrap();
        bundle.insert(&locale("en_GB"), "colour", "Colour").unwrap();
        let resolver = TranslationResolver::new(Arc::clone(&bundle) as Arc<dyn Bundle>);
        (bundle, resolver)
    }

    fn text(entry: Option<Arc<TranslationEntry>>) -> Option<String> {
        entry.map(|entry| entry.template().text_content())
    }

    #[test]
    fn test_most_specific_wins() {
        let (_, resolver) = setup();
        assert_eq!(text(resolver.resolve("colour", &locale("en_GB"))).as_deref(), Some("Colour"));
        assert_eq!(text(resolver.resolve("greeting", &locale("en_GB"))).as_deref(), Some("Hello"));
    }

    #[test]
    fn test_falls_back_to_root() {
        let (_, resolver) = setup();
        let entry = resolver.resolve("greeting", &locale("fr_FR")).unwrap();
        assert_eq!(entry.template().text_content(), "Hi");
        assert!(entry.locale().is_root());
    }

    #[test]
    fn test_miss_is_none() {
        let (_, resolver) = setup();
        assert!(resolver.resolve("colour", &locale("en_US")).is_none());
        assert!(resolver.resolve("missing.key", &locale("en")).is_none());
    }

    #[test]
    fn test_hits_and_misses_are_cached() {
        let (_, resolver) = setup();
        resolver.resolve("greeting", &locale("en"));
        resolver.resolve("greeting", &locale("en"));
        resolver.resolve("missing", &locale("en"));
        resolver.resolve("missing", &locale("en"));

        assert_eq!(
            resolver.cache_stats(),
            CacheStats {
                hits: 2,
                misses: 2,
                entries: 2,
            }
        );
    }

    #[test]
    fn test_bundle_change_invalidates_cache() {
        let (bundle, resolver) = setup();
        assert!(resolver.resolve("late", &locale("en")).is_none());

        bundle.insert(&locale("en"), "late", "Late").unwrap();
        assert_eq!(text(resolver.resolve("late", &locale("en"))).as_deref(), Some("Late"));

        bundle.reload([(locale("en"), "greeting", "Howdy")]).unwrap();
        assert_eq!(text(resolver.resolve("greeting", &locale("en"))).as_deref(), Some("Howdy"));
        assert!(resolver.resolve("late", &locale("en")).is_none());
    }

    #[test]
    fn test_disabled_cache() {
        let (_, resolver) = setup();
        let resolver = resolver.with_cache(false);
        resolver.resolve("greeting", &locale("en"));
        resolver.resolve("greeting", &locale("en"));
        assert_eq!(
            resolver.cache_stats(),
            CacheStats {
                hits: 0,
                misses: 2,
                entries: 0,
            }
        );
    }

    #[test]
    fn test_cached_entry_is_shared() {
        let (_, resolver) = setup();
        let first = resolver.resolve("greeting", &locale("en")).unwrap();
        let second = resolver.resolve("greeting", &locale("en")).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
