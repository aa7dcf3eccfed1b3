//! CLI error types.

use folio_config::ConfigError;
use folio_l10n::L10nError;
use folio_parser::ParseError;
use folio_renderer::RegistryError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Render(#[from] RegistryError),

    #[error("{0}")]
    L10n(#[from] L10nError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}
