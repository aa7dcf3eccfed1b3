//! Tokenizer plugin contract and built-in tokenizers.

mod markdown;
mod plain;
mod wiki;

use std::io::Read;

use folio_tree::SyntaxId;

use crate::error::TokenizeError;
use crate::event::Listener;

pub use markdown::MarkdownTokenizer;
pub use plain::PlainTokenizer;
pub use wiki::WikiTokenizer;

/// Low-level reader for one concrete syntax.
///
/// A tokenizer reads the whole source and reports it to the listener as a
/// single `BeginDocument` .. `EndDocument` event stream. It holds no per-parse
/// state, so one instance serves concurrent parses.
pub trait Tokenizer: Send + Sync {
    /// Syntax this tokenizer reads.
    fn syntax(&self) -> SyntaxId;

    /// Read `source` and emit its structural events to `listener`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenizeError`] if the source cannot be read, is malformed,
    /// or the listener rejects an event.
    fn tokenize(&self, source: &mut dyn Read, listener: &mut dyn Listener)
    -> Result<(), TokenizeError>;
}

/// Read the full source into a string, normalizing `\r\n` line endings.
pub(crate) fn read_source(source: &mut dyn Read) -> Result<String, TokenizeError> {
    let mut text = String::new();
    source.read_to_string(&mut text)?;
    if text.contains('\r') {
        text = text.replace("\r\n", "\n");
    }
    Ok(text)
}
