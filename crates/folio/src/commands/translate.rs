//! `folio translate` command implementation.

use std::path::Path;
use std::sync::Arc;

use clap::Args;
use folio_config::{CliSettings, Config, L10nConfig};
use folio_l10n::{Bundle, Locale, Localizer, MemoryBundle, Parameter, TranslationResolver};
use folio_parser::Parser;
use folio_renderer::RendererRegistry;
use folio_tree::SyntaxId;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the translate command.
#[derive(Args)]
pub(crate) struct TranslateArgs {
    /// Translation key.
    key: String,

    /// Values for the `{0}`, `{1}`, ... placeholders.
    params: Vec<String>,

    /// Locale to translate for, e.g. `de_AT` (overrides config).
    #[arg(short, long, env = "FOLIO_LOCALE")]
    locale: Option<Locale>,

    /// Output syntax (overrides config).
    #[arg(short, long)]
    to: Option<SyntaxId>,

    /// Parse parameters as markup in the message syntax instead of text.
    #[arg(long)]
    markup: bool,
}

impl TranslateArgs {
    /// Execute the translate command.
    ///
    /// A missing translation prints the key and a warning, and is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, a message or parameter does
    /// not parse, or the translation cannot be rendered.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            render_syntax: self.to,
            locale: self.locale,
            ..Default::default()
        };
        let config = Config::load(config_path, Some(&cli_settings))?;
        let l10n = &config.l10n_resolved;

        let parser = Parser::with_defaults();
        let localizer = build_localizer(l10n, parser.clone())?;
        let params = if self.markup {
            self.params
                .iter()
                .map(|param| parser.parse(param, &l10n.message_syntax).map(Parameter::from))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            self.params.into_iter().map(Parameter::from).collect()
        };

        if localizer.resolve(&self.key, &l10n.locale).is_none() {
            output.warning(&format!(
                "No translation for '{}' in locale '{}'",
                self.key, l10n.locale
            ));
        }

        let text = localizer.render(
            &self.key,
            &l10n.locale,
            &config.render.default_syntax,
            &params,
        )?;
        output.result(&text)?;
        Ok(())
    }
}

/// Load the configured messages into a localizer.
fn build_localizer(l10n: &L10nConfig, parser: Parser) -> Result<Localizer, CliError> {
    let bundle = Arc::new(MemoryBundle::with_parser(parser, l10n.message_syntax.clone()));
    bundle.reload(l10n.entries())?;
    tracing::info!(
        messages = bundle.len(),
        syntax = %l10n.message_syntax,
        "Loaded translations"
    );

    let resolver =
        TranslationResolver::new(bundle as Arc<dyn Bundle>).with_cache(l10n.cache_enabled);
    Ok(Localizer::new(
        resolver,
        Arc::new(RendererRegistry::with_defaults()),
    ))
}
