//! Syntax identifiers.

use std::fmt;
use std::str::FromStr;

/// Error returned when a syntax identifier string is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxIdError {
    /// The string has no `/` separating family and version.
    #[error("Invalid syntax identifier '{0}': expected 'family/version'")]
    MissingVersion(String),
    /// Family or version is empty or contains whitespace.
    #[error("Invalid syntax identifier '{0}': family and version must be non-empty words")]
    Malformed(String),
}

/// Identifier of a concrete markup syntax: a family plus a version.
///
/// Used as the registry key for both tokenizers and renderers. Two ids are
/// equal only when family and version match exactly; `xwiki/2.0` and
/// `xwiki/2.1` are different syntaxes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct SyntaxId {
    family: String,
    version: String,
}

impl SyntaxId {
    /// Create a syntax id from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxIdError::Malformed`] if either part is empty or contains
    /// whitespace or `/`.
    pub fn new(family: impl Into<String>, version: impl Into<String>) -> Result<Self, SyntaxIdError> {
        let family = family.into();
        let version = version.into();
        if !is_word(&family) || !is_word(&version) {
            return Err(SyntaxIdError::Malformed(format!("{family}/{version}")));
        }
        Ok(Self { family, version })
    }

    /// Plain text, version 1.0.
    #[must_use]
    pub fn plain() -> Self {
        Self::known("plain", "1.0")
    }

    /// XWiki syntax, version 2.1.
    #[must_use]
    pub fn wiki() -> Self {
        Self::known("xwiki", "2.1")
    }

    /// HTML, version 5.0.
    #[must_use]
    pub fn html() -> Self {
        Self::known("html", "5.0")
    }

    /// `CommonMark` markdown, version 1.2.
    #[must_use]
    pub fn markdown() -> Self {
        Self::known("markdown", "1.2")
    }

    /// Debug event listing, version 1.0.
    #[must_use]
    pub fn event() -> Self {
        Self::known("event", "1.0")
    }

    /// Syntax family (e.g. `"xwiki"`).
    #[must_use]
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Syntax version (e.g. `"2.1"`).
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    fn known(family: &str, version: &str) -> Self {
        Self {
            family: family.to_owned(),
            version: version.to_owned(),
        }
    }
}

fn is_word(s: &str) -> bool {
    !s.is_empty() && !s.chars().any(|c| c.is_whitespace() || c == '/')
}

impl fmt::Display for SyntaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.family, self.version)
    }
}

impl FromStr for SyntaxId {
    type Err = SyntaxIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (family, version) = s
            .split_once('/')
            .ok_or_else(|| SyntaxIdError::MissingVersion(s.to_owned()))?;
        Self::new(family, version)
    }
}

impl TryFrom<String> for SyntaxId {
    type Error = SyntaxIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SyntaxId> for String {
    fn from(id: SyntaxId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let id: SyntaxId = "plain/1.0".parse().unwrap();
        assert_eq!(id.family(), "plain");
        assert_eq!(id.version(), "1.0");
        assert_eq!(id.to_string(), "plain/1.0");
        assert_eq!(id, SyntaxId::plain());
    }

    #[test]
    fn test_equality_is_exact() {
        let a: SyntaxId = "xwiki/2.0".parse().unwrap();
        let b: SyntaxId = "xwiki/2.1".parse().unwrap();
        let c: SyntaxId = "XWiki/2.1".parse().unwrap();
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_eq!(b, SyntaxId::wiki());
    }

    #[test]
    fn test_missing_version() {
        let err = "plain".parse::<SyntaxId>().unwrap_err();
        assert_eq!(err, SyntaxIdError::MissingVersion("plain".to_owned()));
    }

    #[test]
    fn test_malformed_parts() {
        assert!("/1.0".parse::<SyntaxId>().is_err());
        assert!("plain/".parse::<SyntaxId>().is_err());
        assert!("plain text/1.0".parse::<SyntaxId>().is_err());
        assert!("a/b/c".parse::<SyntaxId>().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&SyntaxId::wiki()).unwrap();
        assert_eq!(json, r#""xwiki/2.1""#);
        let back: SyntaxId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SyntaxId::wiki());
        assert!(serde_json::from_str::<SyntaxId>(r#""xwiki""#).is_err());
    }
}
