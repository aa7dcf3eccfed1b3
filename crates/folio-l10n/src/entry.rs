//! Translation entries: pre-parsed message templates.

use folio_parser::{ParseError, Parser};
use folio_tree::{Node, NodeKind, SyntaxId};

use crate::locale::Locale;

/// A translation of one key in one locale.
///
/// The message is parsed once into a `Fragment`-rooted template whose
/// `{n}` markers are [`Placeholder`](NodeKind::Placeholder) nodes. Entries
/// are immutable and shared as `Arc<TranslationEntry>` between bundles,
/// resolver caches and concurrent renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationEntry {
    key: String,
    locale: Locale,
    template: Node,
}

impl TranslationEntry {
    /// Entry for an already built template.
    #[must_use]
    pub fn new(key: impl Into<String>, locale: Locale, template: Node) -> Self {
        Self {
            key: key.into(),
            locale,
            template,
        }
    }

    /// Parse `message` written in `syntax` into an entry.
    ///
    /// Placeholders follow message format rules:
    ///
    /// - `{0}`, `{1}`, ... mark parameter positions
    /// - `''` is a literal apostrophe
    /// - an apostrophe directly before `{` or `}` starts quoted text that
    ///   runs to the next lone apostrophe, so `'{0}'` is the literal `{0}`
    /// - any other apostrophe is literal (`Don't` stays `Don't`)
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the message does not parse in `syntax`.
    pub fn from_message(
        key: impl Into<String>,
        locale: Locale,
        message: &str,
        parser: &Parser,
        syntax: &SyntaxId,
    ) -> Result<Self, ParseError> {
        let document = parser.parse(message, syntax)?;
        let fragment = Node::fragment(document.children);
        let template = fragment.rewrite(&mut |node| match &node.kind {
            NodeKind::Text(text) => Some(split_placeholders(text)),
            _ => None,
        });
        Ok(Self::new(key, locale, template))
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Locale the entry was defined in, which may be less specific than the
    /// locale it was resolved for.
    #[must_use]
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    #[must_use]
    pub fn template(&self) -> &Node {
        &self.template
    }

    /// Number of parameters the template refers to (highest index + 1).
    #[must_use]
    pub fn arity(&self) -> usize {
        self.template
            .iter()
            .filter_map(|node| match node.kind {
                NodeKind::Placeholder { index } => Some(index.saturating_add(1)),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }
}

/// Split a text run into text and placeholder nodes.
fn split_placeholders(text: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut buf = String::new();
    let mut quoted = false;
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        let after = &rest[c.len_utf8()..];
        if c == '\'' {
            if let Some(stripped) = after.strip_prefix('\'') {
                buf.push('\'');
                rest = stripped;
            } else if quoted {
                quoted = false;
                rest = after;
            } else if after.starts_with(['{', '}']) {
                quoted = true;
                rest = after;
            } else {
                buf.push('\'');
                rest = after;
            }
            continue;
        }

        if c == '{'
            && !quoted
            && let Some((digits, tail)) = after.split_once('}')
            && !digits.is_empty()
            && digits.bytes().all(|b| b.is_ascii_digit())
            && let Ok(index) = digits.parse::<usize>()
        {
            if !buf.is_empty() {
                nodes.push(Node::text(std::mem::take(&mut buf)));
            }
            nodes.push(Node::placeholder(index));
            rest = tail;
            continue;
        }

        buf.push(c);
        rest = after;
    }

    if !buf.is_empty() {
        nodes.push(Node::text(buf));
    }
    nodes
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn plain(message: &str) -> TranslationEntry {
        TranslationEntry::from_message(
            "key",
            Locale::ROOT,
            message,
            &Parser::with_defaults(),
            &SyntaxId::plain(),
        )
        .unwrap()
    }

    #[test]
    fn test_placeholders_are_split() {
        assert_eq!(
            plain("Hello, {0}!").template(),
            &Node::fragment(vec![Node::paragraph(vec![
                Node::text("Hello, "),
                Node::placeholder(0),
                Node::text("!"),
            ])])
        );
    }

    #[test]
    fn test_quoting() {
        assert_eq!(split_placeholders("It''s {0}"), vec![
            Node::text("It's "),
            Node::placeholder(0),
        ]);
        assert_eq!(split_placeholders("'{0}' is literal"), vec![Node::text("{0} is literal")]);
        assert_eq!(split_placeholders("Don't panic"), vec![Node::text("Don't panic")]);
    }

    #[test]
    fn test_non_numeric_braces_stay_text() {
        assert_eq!(split_placeholders("{name} and {1"), vec![Node::text("{name} and {1")]);
        assert_eq!(split_placeholders("{}"), vec![Node::text("{}")]);
        assert_eq!(split_placeholders("{+1}"), vec![Node::text("{+1}")]);
    }

    #[test]
    fn test_wiki_message_keeps_markup() {
        let entry = TranslationEntry::from_message(
            "key",
            Locale::ROOT,
            "**{0}** replied",
            &Parser::with_defaults(),
            &SyntaxId::wiki(),
        )
        .unwrap();
        assert_eq!(
            entry.template(),
            &Node::fragment(vec![Node::paragraph(vec![
                Node::strong(vec![Node::placeholder(0)]),
                Node::text(" replied"),
            ])])
        );
    }

    #[test]
    fn test_arity() {
        assert_eq!(plain("no params").arity(), 0);
        assert_eq!(plain("{2} then {0}").arity(), 3);
    }

    #[test]
    fn test_arity_saturates_at_largest_index() {
        let message = format!("x {{{}}}", usize::MAX);
        assert_eq!(plain(&message).arity(), usize::MAX);
    }

    #[test]
    fn test_parse_failure() {
        let err = TranslationEntry::from_message(
            "key",
            Locale::ROOT,
            "**unclosed",
            &Parser::with_defaults(),
            &SyntaxId::wiki(),
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::Failed { .. }));
    }
}
