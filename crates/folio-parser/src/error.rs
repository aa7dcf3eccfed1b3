//! Parsing error types.

use folio_tree::SyntaxId;

/// The event stream does not describe a well-formed tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructuralError {
    /// An element event arrived before the document was opened.
    #[error("{0} before the document was opened")]
    BeforeBegin(&'static str),
    /// An event arrived after the document was closed.
    #[error("{0} after the document was closed")]
    AfterEnd(&'static str),
    /// An end event does not match the innermost open element.
    #[error("{found} does not close the open {open}")]
    Mismatched {
        /// Kind of the innermost open node.
        open: &'static str,
        /// Name of the offending end event.
        found: &'static str,
    },
    /// The stream ended while elements were still open.
    #[error("stream ended with {0} still open")]
    Unclosed(&'static str),
    /// The stream never opened a document.
    #[error("stream contained no document")]
    Empty,
}

/// Failure reported by a tokenizer.
#[derive(Debug, thiserror::Error)]
pub enum TokenizeError {
    /// Input text cannot be read as the tokenizer's syntax.
    #[error("line {line}: {message}")]
    Malformed {
        /// 1-based line of the offending construct.
        line: usize,
        /// Description of the problem.
        message: String,
    },
    /// Reading the source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The listener rejected an event.
    #[error(transparent)]
    Structural(#[from] StructuralError),
}

impl TokenizeError {
    pub(crate) fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            message: message.into(),
        }
    }
}

/// Error returned by [`Parser::parse`](crate::Parser::parse).
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// No tokenizer is registered for the requested syntax.
    #[error("No parser registered for syntax '{0}'")]
    UnsupportedSyntax(SyntaxId),
    /// The event stream was unbalanced.
    #[error("Malformed event stream: {0}")]
    Structural(#[from] StructuralError),
    /// The tokenizer failed; the cause is kept as the error source.
    #[error("Failed to parse {syntax} input")]
    Failed {
        /// Syntax being parsed.
        syntax: SyntaxId,
        /// Underlying tokenizer failure.
        #[source]
        source: TokenizeError,
    },
}
