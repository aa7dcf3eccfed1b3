//! Parser façade: syntax lookup plus tokenizer-to-builder wiring.

use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;

use folio_tree::{Node, SyntaxId};

use crate::builder::TreeBuilder;
use crate::error::{ParseError, TokenizeError};
use crate::link::{DefaultLinkResolver, LinkResolver};
use crate::tokenizer::{MarkdownTokenizer, PlainTokenizer, Tokenizer, WikiTokenizer};

/// Parses text of a registered syntax into a document tree.
///
/// Holds an immutable `syntax → tokenizer` table built once with
/// [`ParserBuilder`]. Each call to [`parse`](Self::parse) creates a private
/// [`TreeBuilder`], so a single `Parser` can serve concurrent parses.
#[derive(Clone)]
pub struct Parser {
    tokenizers: HashMap<SyntaxId, Arc<dyn Tokenizer>>,
    link_resolver: Arc<dyn LinkResolver>,
}

impl Parser {
    /// Start building a parser with no tokenizers.
    #[must_use]
    pub fn builder() -> ParserBuilder {
        ParserBuilder::default()
    }

    /// Parser for every built-in syntax, using [`DefaultLinkResolver`].
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::builder().with_default_tokenizers().build()
    }

    /// Parse `text` written in `syntax`.
    ///
    /// # Errors
    ///
    /// - [`ParseError::UnsupportedSyntax`] if no tokenizer is registered
    /// - [`ParseError::Structural`] if the tokenizer emitted an unbalanced stream
    /// - [`ParseError::Failed`] if the tokenizer rejected the input
    pub fn parse(&self, text: &str, syntax: &SyntaxId) -> Result<Node, ParseError> {
        self.parse_reader(&mut text.as_bytes(), syntax)
    }

    /// Parse a source read from `source`.
    ///
    /// I/O failures while reading are reported as [`ParseError::Failed`] with
    /// a [`TokenizeError::Io`] cause.
    ///
    /// # Errors
    ///
    /// Same as [`parse`](Self::parse).
    pub fn parse_reader(&self, source: &mut dyn Read, syntax: &SyntaxId) -> Result<Node, ParseError> {
        let tokenizer = self
            .tokenizers
            .get(syntax)
            .ok_or_else(|| ParseError::UnsupportedSyntax(syntax.clone()))?;

        let mut builder = TreeBuilder::new(Arc::clone(&self.link_resolver));
        match tokenizer.tokenize(source, &mut builder) {
            Ok(()) => {}
            Err(TokenizeError::Structural(err)) => return Err(ParseError::Structural(err)),
            Err(source) => {
                return Err(ParseError::Failed {
                    syntax: syntax.clone(),
                    source,
                });
            }
        }
        Ok(builder.finish()?)
    }

    /// Whether a tokenizer is registered for `syntax`.
    #[must_use]
    pub fn supports(&self, syntax: &SyntaxId) -> bool {
        self.tokenizers.contains_key(syntax)
    }

    /// Registered syntaxes, sorted.
    #[must_use]
    pub fn syntaxes(&self) -> Vec<SyntaxId> {
        let mut ids: Vec<SyntaxId> = self.tokenizers.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Builder for [`Parser`].
pub struct ParserBuilder {
    tokenizers: HashMap<SyntaxId, Arc<dyn Tokenizer>>,
    link_resolver: Arc<dyn LinkResolver>,
}

impl Default for ParserBuilder {
    fn default() -> Self {
        Self {
            tokenizers: HashMap::new(),
            link_resolver: Arc::new(DefaultLinkResolver),
        }
    }
}

impl ParserBuilder {
    /// Register a tokenizer under its own syntax id.
    ///
    /// A later registration for the same syntax replaces the earlier one.
    #[must_use]
    pub fn tokenizer<T: Tokenizer + 'static>(mut self, tokenizer: T) -> Self {
        self.tokenizers.insert(tokenizer.syntax(), Arc::new(tokenizer));
        self
    }

    /// Register the built-in plain, wiki and markdown tokenizers.
    #[must_use]
    pub fn with_default_tokenizers(self) -> Self {
        self.tokenizer(PlainTokenizer)
            .tokenizer(WikiTokenizer)
            .tokenizer(MarkdownTokenizer)
    }

    /// Use `resolver` for link targets.
    #[must_use]
    pub fn link_resolver<R: LinkResolver + 'static>(mut self, resolver: R) -> Self {
        self.link_resolver = Arc::new(resolver);
        self
    }

    #[must_use]
    pub fn build(self) -> Parser {
        Parser {
            tokenizers: self.tokenizers,
            link_resolver: self.link_resolver,
        }
    }
}
