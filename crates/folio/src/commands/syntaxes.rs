//! `folio syntaxes` command implementation.

use std::path::Path;

use folio_config::Config;
use folio_parser::Parser;
use folio_renderer::RendererRegistry;
use folio_tree::SyntaxId;

use crate::error::CliError;
use crate::output::Output;

/// Execute the syntaxes command.
///
/// Configured defaults are marked with `*`.
///
/// # Errors
///
/// Returns an error if configuration fails to load or stdout is closed.
pub(crate) fn execute(config_path: Option<&Path>) -> Result<(), CliError> {
    let output = Output::new();
    let config = Config::load(config_path, None)?;

    output.highlight("Input syntaxes:")?;
    let parsers = Parser::with_defaults().syntaxes();
    for line in listing(&parsers, &config.parse.default_syntax) {
        output.result(&line)?;
    }

    output.highlight("Output syntaxes:")?;
    let renderers = RendererRegistry::with_defaults().syntaxes();
    for line in listing(&renderers, &config.render.default_syntax) {
        output.result(&line)?;
    }
    Ok(())
}

fn listing(syntaxes: &[SyntaxId], default: &SyntaxId) -> Vec<String> {
    syntaxes
        .iter()
        .map(|syntax| {
            let marker = if syntax == default { '*' } else { ' ' };
            format!("{marker} {syntax}")
        })
        .collect()
}
