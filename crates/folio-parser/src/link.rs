//! Link target resolution.
//!
//! Tokenizers report link targets verbatim. A [`LinkResolver`] decides whether
//! a raw target is valid and what it points at. Targets that fail resolution
//! end up as `BrokenLink` nodes instead of aborting the parse.

use std::collections::HashSet;
use std::sync::LazyLock;

use folio_tree::LinkTarget;
use regex::Regex;

/// URL with an RFC 3986 scheme.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://\S+$").expect("invalid url regex")
});

/// Bare e-mail address.
static MAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("invalid mail regex"));

/// Page reference: `Space.Page`, `Page`, `space/page`, words and spaces.
static PAGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{N}_][\p{L}\p{N} _./\-]*$").expect("invalid page regex"));

/// A raw link target that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unresolved link target '{raw}': {reason}")]
pub struct Unresolved {
    /// Target as written in the source.
    pub raw: String,
    /// Why the target was rejected.
    pub reason: String,
}

impl Unresolved {
    fn new(raw: &str, reason: impl Into<String>) -> Self {
        Self {
            raw: raw.to_owned(),
            reason: reason.into(),
        }
    }
}

/// Maps raw link targets to validated [`LinkTarget`]s.
pub trait LinkResolver: Send + Sync {
    /// Resolve a raw target.
    ///
    /// # Errors
    ///
    /// Returns [`Unresolved`] if the target is not valid for this resolver.
    fn resolve(&self, raw: &str) -> Result<LinkTarget, Unresolved>;
}

/// Syntactic resolver accepting URLs, e-mail addresses and page names.
///
/// - `https://example.com/x` → [`LinkKind::Url`](folio_tree::LinkKind::Url)
/// - `mailto:someone@example.com` or a bare `someone@example.com` → `Mail`
/// - `Main.WebHome`, `docs/guide` → `Page`
///
/// Anything else (empty targets, stray markup characters) is unresolved.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultLinkResolver;

impl LinkResolver for DefaultLinkResolver {
    fn resolve(&self, raw: &str) -> Result<LinkTarget, Unresolved> {
        let target = raw.trim();
        if target.is_empty() {
            return Err(Unresolved::new(raw, "empty target"));
        }

        if let Some(address) = target.strip_prefix("mailto:") {
            return if MAIL_PATTERN.is_match(address) {
                Ok(LinkTarget::mail(address))
            } else {
                Err(Unresolved::new(raw, "invalid e-mail address"))
            };
        }

        if target.contains("://") {
            return if URL_PATTERN.is_match(target) {
                Ok(LinkTarget::url(target))
            } else {
                Err(Unresolved::new(raw, "invalid URL"))
            };
        }

        if MAIL_PATTERN.is_match(target) {
            return Ok(LinkTarget::mail(target));
        }

        if PAGE_PATTERN.is_match(target) {
            Ok(LinkTarget::page(target))
        } else {
            Err(Unresolved::new(raw, "invalid page reference"))
        }
    }
}

/// Resolver that only accepts page references to known pages.
///
/// URLs and e-mail addresses are validated like [`DefaultLinkResolver`] does.
#[derive(Debug, Default, Clone)]
pub struct PageSetLinkResolver {
    pages: HashSet<String>,
}

impl PageSetLinkResolver {
    /// Create a resolver knowing the given pages.
    #[must_use]
    pub fn new<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pages: pages.into_iter().map(Into::into).collect(),
        }
    }

    /// Add a known page.
    pub fn insert(&mut self, page: impl Into<String>) {
        self.pages.insert(page.into());
    }
}

impl LinkResolver for PageSetLinkResolver {
    fn resolve(&self, raw: &str) -> Result<LinkTarget, Unresolved> {
        let target = DefaultLinkResolver.resolve(raw)?;
        match target.kind {
            folio_tree::LinkKind::Page if !self.pages.contains(&target.reference) => {
                Err(Unresolved::new(raw, "page does not exist"))
            }
            _ => Ok(target),
        }
    }
}
