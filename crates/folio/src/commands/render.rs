//! `folio render` command implementation.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use folio_config::{CliSettings, Config};
use folio_parser::Parser;
use folio_renderer::RendererRegistry;
use folio_tree::{Node, SyntaxId};

use crate::error::CliError;
use crate::output::Output;

/// Output format of the render command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    /// Render with the output syntax.
    #[default]
    Text,
    /// Dump the parsed document tree as JSON.
    Json,
}

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Input document (default: read stdin).
    file: Option<PathBuf>,

    /// Input syntax, e.g. `xwiki/2.1` (overrides config).
    #[arg(short, long)]
    from: Option<SyntaxId>,

    /// Output syntax, e.g. `html/5.0` (overrides config).
    #[arg(short, long)]
    to: Option<SyntaxId>,

    /// Output format; `json` ignores `--to`.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, reading, parsing or rendering fails.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            parse_syntax: self.from,
            render_syntax: self.to,
            ..Default::default()
        };
        let config = Config::load(config_path, Some(&cli_settings))?;
        let from = &config.parse.default_syntax;
        let to = &config.render.default_syntax;

        let parser = Parser::with_defaults();
        let document = match &self.file {
            Some(path) => {
                let mut reader = BufReader::new(File::open(path)?);
                parser.parse_reader(&mut reader, from)?
            }
            None => parser.parse_reader(&mut io::stdin().lock(), from)?,
        };
        tracing::info!(%from, %to, nodes = document.iter().count(), "Parsed document");

        output.result(&format_document(&document, self.format, to)?)?;
        Ok(())
    }
}

/// Render `document` as `to`, or serialize the tree itself for [`Format::Json`].
fn format_document(document: &Node, format: Format, to: &SyntaxId) -> Result<String, CliError> {
    match format {
        Format::Text => Ok(RendererRegistry::with_defaults().render(to, document)?),
        Format::Json => Ok(serde_json::to_string_pretty(document)?),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn document() -> Node {
        Parser::with_defaults()
            .parse("Hello **Ada**", &SyntaxId::wiki())
            .unwrap()
    }

    #[test]
    fn test_text_format_renders_output_syntax() {
        let text = format_document(&document(), Format::Text, &SyntaxId::html()).unwrap();
        assert_eq!(text, "<p>Hello <strong>Ada</strong></p>");
    }

    #[test]
    fn test_json_format_dumps_tree() {
        let json = format_document(&document(), Format::Json, &SyntaxId::html()).unwrap();
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back, document());
        assert!(json.contains(r#""kind": "paragraph""#), "got {json}");
    }

    #[test]
    fn test_unknown_output_syntax_fails() {
        let to: SyntaxId = "html/9.9".parse().unwrap();
        let err = format_document(&document(), Format::Text, &to).unwrap_err();
        assert_eq!(err.to_string(), "No renderer registered for syntax 'html/9.9'");
    }
}
