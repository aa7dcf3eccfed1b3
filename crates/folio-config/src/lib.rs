//! Configuration management for Folio.
//!
//! Parses `folio.toml` files with serde and discovers them in the current
//! directory or its parents. CLI flags are applied on top via
//! [`CliSettings`].
//!
//! ```toml
//! [parse]
//! default_syntax = "xwiki/2.1"
//!
//! [render]
//! default_syntax = "plain/1.0"
//!
//! [l10n]
//! locale = "${FOLIO_LOCALE:-en}"
//! cache = true
//! message_syntax = "xwiki/2.1"
//!
//! [l10n.messages.en]
//! greeting = "Hello, **{0}**!"
//!
//! [l10n.messages.de]
//! greeting = "Hallo, **{0}**!"
//! ```
//!
//! `l10n.locale` supports `${VAR}` and `${VAR:-default}` expansion. The
//! message table `root` (or an empty table name) holds root-locale
//! messages that every locale falls back to.

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use folio_l10n::Locale;
use folio_tree::SyntaxId;
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// Only `Some` values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the input syntax.
    pub parse_syntax: Option<SyntaxId>,
    /// Override the output syntax.
    pub render_syntax: Option<SyntaxId>,
    /// Override the locale.
    pub locale: Option<Locale>,
    /// Override the resolver cache flag.
    pub cache_enabled: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "folio.toml";

/// Message table name for root-locale messages.
const ROOT_TABLE: &str = "root";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Parsing configuration.
    pub parse: ParseConfig,
    /// Rendering configuration.
    pub render: RenderConfig,
    /// Localization configuration as written in TOML.
    l10n: L10nConfigRaw,

    /// Resolved localization configuration (set after loading).
    #[serde(skip)]
    pub l10n_resolved: L10nConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Parsing configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Syntax of input documents when none is given.
    pub default_syntax: SyntaxId,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            default_syntax: SyntaxId::wiki(),
        }
    }
}

/// Rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output syntax when none is given.
    pub default_syntax: SyntaxId,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            default_syntax: SyntaxId::plain(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct L10nConfigRaw {
    locale: Option<String>,
    cache: Option<bool>,
    message_syntax: Option<SyntaxId>,
    messages: BTreeMap<String, BTreeMap<String, String>>,
}

/// Resolved localization configuration.
#[derive(Debug)]
pub struct L10nConfig {
    /// Locale used when the caller names none.
    pub locale: Locale,
    /// Whether the translation resolver caches lookups.
    pub cache_enabled: bool,
    /// Syntax that messages are written in.
    pub message_syntax: SyntaxId,
    /// Messages keyed by locale, then by translation key.
    pub messages: BTreeMap<Locale, BTreeMap<String, String>>,
}

impl Default for L10nConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            cache_enabled: true,
            message_syntax: SyntaxId::plain(),
            messages: BTreeMap::new(),
        }
    }
}

impl L10nConfig {
    /// All messages as `(locale, key, message)` triples.
    pub fn entries(&self) -> impl Iterator<Item = (Locale, &str, &str)> + '_ {
        self.messages.iter().flat_map(|(locale, messages)| {
            messages
                .iter()
                .map(move |(key, message)| (locale.clone(), key.as_str(), message.as_str()))
        })
    }
}

fn default_locale() -> Locale {
    "en".parse().unwrap_or_default()
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g. `l10n.locale`).
        field: String,
        /// Error message (e.g. `${FOLIO_LOCALE} not set`).
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn parse_locale(tag: &str, field: &str) -> Result<Locale, ConfigError> {
    if tag == ROOT_TABLE {
        return Ok(Locale::ROOT);
    }
    tag.parse()
        .map_err(|e| ConfigError::Validation(format!("{field}: {e}")))
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `folio.toml` in the current directory and its parents, falling
    /// back to defaults when none exists.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit `config_path` doesn't exist, or if
    /// reading, parsing, expansion or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(syntax) = &settings.parse_syntax {
            self.parse.default_syntax.clone_from(syntax);
        }
        if let Some(syntax) = &settings.render_syntax {
            self.render.default_syntax.clone_from(syntax);
        }
        if let Some(locale) = &settings.locale {
            self.l10n_resolved.locale.clone_from(locale);
        }
        if let Some(cache_enabled) = settings.cache_enabled {
            self.l10n_resolved.cache_enabled = cache_enabled;
        }
    }

    /// Search for the config file in the current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_from(&current)
    }

    fn discover_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.exists())
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse, expand and validate configuration from TOML text.
    fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_env_vars()?;
        config.resolve_l10n()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a message key or message is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (locale, messages) in &self.l10n_resolved.messages {
            for (key, message) in messages {
                let field = format!("l10n.messages.{locale}");
                require_non_empty(key, &format!("{field} key"))?;
                require_non_empty(message, &format!("{field}.{key}"))?;
            }
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref locale) = self.l10n.locale {
            self.l10n.locale = Some(expand::expand_env(locale, "l10n.locale")?);
        }
        Ok(())
    }

    /// Turn the raw `[l10n]` section into typed values.
    fn resolve_l10n(&mut self) -> Result<(), ConfigError> {
        let raw = std::mem::take(&mut self.l10n);
        let defaults = L10nConfig::default();

        let locale = match raw.locale.as_deref() {
            Some(tag) => parse_locale(tag, "l10n.locale")?,
            None => defaults.locale,
        };

        let mut messages: BTreeMap<Locale, BTreeMap<String, String>> = BTreeMap::new();
        for (tag, table) in raw.messages {
            let locale = parse_locale(&tag, &format!("l10n.messages.{tag}"))?;
            messages.entry(locale).or_default().extend(table);
        }

        self.l10n_resolved = L10nConfig {
            locale,
            cache_enabled: raw.cache.unwrap_or(defaults.cache_enabled),
            message_syntax: raw.message_syntax.unwrap_or(defaults.message_syntax),
            messages,
        };
        Ok(())
    }
}
