//! Locale identifiers and fallback chains.

use std::fmt;
use std::str::FromStr;

/// Error returned when a locale tag cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocaleError {
    #[error("Invalid language '{language}' in locale '{tag}'")]
    Language { tag: String, language: String },
    #[error("Invalid segment '{segment}' in locale '{tag}'")]
    Segment { tag: String, segment: String },
}

/// A locale: language, optional country and optional variant.
///
/// Parsed from `en`, `en_US`, `en-US`, `en_US_POSIX` or `zh_Hant_TW`-style
/// tags. The language is lowercased and the country uppercased. The first
/// segment after the language that looks like a country (two letters or
/// three digits) becomes the country; all other segments form the variant,
/// joined by `_`.
///
/// [`Locale::ROOT`] is the empty locale every fallback chain ends with. It
/// displays and parses as the empty string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale {
    language: String,
    country: Option<String>,
    variant: Option<String>,
}

impl Locale {
    /// The root locale.
    pub const ROOT: Locale = Locale {
        language: String::new(),
        country: None,
        variant: None,
    };

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    #[must_use]
    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.language.is_empty()
    }

    /// The next less specific locale, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Locale> {
        if self.variant.is_some() {
            Some(Locale {
                variant: None,
                ..self.clone()
            })
        } else if self.country.is_some() {
            Some(Locale {
                country: None,
                ..self.clone()
            })
        } else if self.is_root() {
            None
        } else {
            Some(Self::ROOT)
        }
    }

    /// This locale followed by each parent, ending with [`Locale::ROOT`].
    ///
    /// `en_US_POSIX` yields `en_US_POSIX`, `en_US`, `en`, root.
    #[must_use]
    pub fn fallback_chain(&self) -> Vec<Locale> {
        let mut chain = vec![self.clone()];
        while let Some(parent) = chain.last().and_then(Locale::parent) {
            chain.push(parent);
        }
        chain
    }
}

fn is_country(segment: &str) -> bool {
    (segment.len() == 2 && segment.chars().all(|c| c.is_ascii_alphabetic()))
        || (segment.len() == 3 && segment.chars().all(|c| c.is_ascii_digit()))
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Ok(Self::ROOT);
        }

        let mut segments = tag.split(['_', '-']);
        let language = segments.next().unwrap_or_default();
        if !(2..=8).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(LocaleError::Language {
                tag: tag.to_owned(),
                language: language.to_owned(),
            });
        }

        let mut country = None;
        let mut variant: Vec<&str> = Vec::new();
        for segment in segments {
            if segment.is_empty() {
                continue;
            }
            if !segment.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(LocaleError::Segment {
                    tag: tag.to_owned(),
                    segment: segment.to_owned(),
                });
            }
            if country.is_none() && is_country(segment) {
                country = Some(segment.to_ascii_uppercase());
            } else {
                variant.push(segment);
            }
        }

        Ok(Self {
            language: language.to_ascii_lowercase(),
            country,
            variant: (!variant.is_empty()).then(|| variant.join("_")),
        })
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.language)?;
        match (&self.country, &self.variant) {
            (Some(country), Some(variant)) => write!(f, "_{country}_{variant}"),
            (Some(country), None) => write!(f, "_{country}"),
            (None, Some(variant)) => write!(f, "__{variant}"),
            (None, None) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn locale(tag: &str) -> Locale {
        tag.parse().unwrap()
    }

    #[test]
    fn test_parse_forms() {
        let en_us = locale("en_US");
        assert_eq!(en_us.language(), "en");
        assert_eq!(en_us.country(), Some("US"));
        assert_eq!(en_us.variant(), None);

        assert_eq!(locale("en-us"), en_us);
        assert_eq!(locale("EN_us"), en_us);
        assert_eq!(locale("es_419").country(), Some("419"));
    }

    #[test]
    fn test_script_segment_becomes_variant() {
        let zh = locale("zh_Hant_TW");
        assert_eq!(zh.language(), "zh");
        assert_eq!(zh.country(), Some("TW"));
        assert_eq!(zh.variant(), Some("Hant"));
        assert_eq!(zh.to_string(), "zh_TW_Hant");
    }

    #[test]
    fn test_display_round_trips() {
        for tag in ["", "en", "en_US", "en_US_POSIX", "de__POSIX"] {
            assert_eq!(locale(tag).to_string(), tag);
        }
    }

    #[test]
    fn test_root() {
        assert!(locale("").is_root());
        assert_eq!(Locale::ROOT.parent(), None);
        assert_eq!(Locale::ROOT.fallback_chain(), vec![Locale::ROOT]);
    }

    #[test]
    fn test_fallback_chain() {
        let chain: Vec<String> = locale("en_US_POSIX")
            .fallback_chain()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(chain, ["en_US_POSIX", "en_US", "en", ""]);

        let chain: Vec<String> = locale("fr").fallback_chain().iter().map(ToString::to_string).collect();
        assert_eq!(chain, ["fr", ""]);
    }

    #[test]
    fn test_invalid_tags() {
        assert!(matches!(
            "e".parse::<Locale>(),
            Err(LocaleError::Language { .. })
        ));
        assert!(matches!(
            "3n_US".parse::<Locale>(),
            Err(LocaleError::Language { .. })
        ));
        assert!(matches!(
            "en_U$".parse::<Locale>(),
            Err(LocaleError::Segment { .. })
        ));
    }
}
