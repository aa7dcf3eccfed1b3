//! XWiki 2.1 renderer.

use folio_tree::{LinkKind, Node, NodeKind, SyntaxId};

use crate::renderer::{BlockRun, RenderError, Renderer, block_runs};

/// Renderer for `xwiki/2.1`.
///
/// Emits the same subset the wiki tokenizer reads, escaping text with `~`
/// wherever it would otherwise be taken for markup. Any tree produced by the
/// wiki tokenizer renders back to text that parses into an equal tree.
///
/// Sections are transparent. Placeholders render as `{n}`. Constructs the
/// syntax cannot express (inline macros, headings or rules inside list items)
/// fail with [`RenderError::UnsupportedNode`].
#[derive(Debug, Default, Clone, Copy)]
pub struct WikiRenderer;

impl Renderer for WikiRenderer {
    fn syntax(&self) -> SyntaxId {
        SyntaxId::wiki()
    }

    fn render(&self, tree: &Node, out: &mut String) -> Result<(), RenderError> {
        let mut writer = WikiWriter {
            out,
            first_block: true,
            closing_emphasis: false,
        };
        writer.blocks(std::slice::from_ref(tree))
    }
}

/// Where escaped text sits relative to line structure.
#[derive(Clone, Copy, Default)]
struct TextPosition {
    /// First thing on a line: block markers must be escaped.
    line_start: bool,
    /// Last inline outside a paragraph: trailing `=` and spaces must be
    /// escaped.
    heading_end: bool,
    /// Followed by an emphasis marker: a trailing colon must be escaped.
    before_emphasis: bool,
}

struct WikiWriter<'a> {
    out: &'a mut String,
    first_block: bool,
    /// The next inline run is closed by `//`.
    closing_emphasis: bool,
}

impl WikiWriter<'_> {
    fn unsupported(kind: &NodeKind) -> RenderError {
        RenderError::unsupported(SyntaxId::wiki(), kind)
    }

    fn start_block(&mut self) {
        if !self.first_block {
            self.out.push_str("\n\n");
        }
        self.first_block = false;
    }

    fn blocks(&mut self, nodes: &[Node]) -> Result<(), RenderError> {
        for run in block_runs(nodes) {
            match run {
                BlockRun::Inline(nodes) => {
                    self.start_block();
                    self.inline(nodes, true, true)?;
                }
                BlockRun::Block(node) => self.block(node)?,
            }
        }
        Ok(())
    }

    fn block(&mut self, node: &Node) -> Result<(), RenderError> {
        match &node.kind {
            NodeKind::Document | NodeKind::Fragment | NodeKind::Section { .. } => {
                self.blocks(&node.children)?;
            }
            NodeKind::Heading { level } => {
                self.start_block();
                let marker = "=".repeat(usize::from((*level).clamp(1, 6)));
                self.out.push_str(&marker);
                self.out.push(' ');
                self.heading_content(&node.children)?;
                self.out.push(' ');
                self.out.push_str(&marker);
            }
            NodeKind::Paragraph => {
                self.start_block();
                self.inline(&node.children, true, true)?;
            }
            NodeKind::List { ordered } => {
                self.start_block();
                for (i, item) in node.children.iter().enumerate() {
                    if i > 0 {
                        self.out.push('\n');
                    }
                    self.list_item(item, *ordered)?;
                }
            }
            NodeKind::ListItem => {
                self.start_block();
                self.list_item(node, false)?;
            }
            NodeKind::HorizontalRule => {
                self.start_block();
                self.out.push_str("----");
            }
            NodeKind::Macro {
                name,
                params,
                content,
            } => {
                self.start_block();
                self.out.push_str("{{");
                self.out.push_str(name);
                for (key, value) in params {
                    self.out.push(' ');
                    self.out.push_str(key);
                    self.out.push_str("=\"");
                    self.out.push_str(value);
                    self.out.push('"');
                }
                match content {
                    Some(content) => {
                        self.out.push_str("}}\n");
                        self.out.push_str(content);
                        self.out.push_str("\n{{/");
                        self.out.push_str(name);
                        self.out.push_str("}}");
                    }
                    None => self.out.push_str("/}}"),
                }
            }
            other => return Err(Self::unsupported(other)),
        }
        Ok(())
    }

    fn heading_content(&mut self, children: &[Node]) -> Result<(), RenderError> {
        if let Some(block) = children.iter().find(|child| is_block_child(&child.kind)) {
            return Err(Self::unsupported(&block.kind));
        }
        self.inline(children, true, false)
    }

    fn list_item(&mut self, item: &Node, ordered: bool) -> Result<(), RenderError> {
        if item.kind != NodeKind::ListItem {
            return Err(Self::unsupported(&item.kind));
        }
        self.out.push_str(if ordered { "1. " } else { "* " });
        // Loose list items wrap their content in paragraphs.
        let mut line_start = true;
        for run in block_runs(&item.children) {
            let nodes = match run {
                BlockRun::Inline(nodes) => nodes,
                BlockRun::Block(node) if node.kind == NodeKind::Paragraph => &node.children,
                BlockRun::Block(node) => return Err(Self::unsupported(&node.kind)),
            };
            if !line_start {
                self.out.push(' ');
            }
            self.inline(nodes, line_start, false)?;
            line_start = false;
        }
        Ok(())
    }

    /// Write inline nodes. Inside paragraphs line breaks may be written as
    /// newlines; elsewhere they must use the `\\` form.
    fn inline(&mut self, nodes: &[Node], line_start: bool, in_paragraph: bool) -> Result<(), RenderError> {
        let closes_emphasis = std::mem::take(&mut self.closing_emphasis);
        let mut at_line_start = line_start;
        for (i, node) in nodes.iter().enumerate() {
            let next = nodes.get(i + 1);
            match &node.kind {
                NodeKind::Text(text) => {
                    let position = TextPosition {
                        line_start: at_line_start,
                        heading_end: !in_paragraph && next.is_none(),
                        before_emphasis: next.map_or(closes_emphasis, |n| n.kind == NodeKind::Emphasis),
                    };
                    escape_text(text, position, self.out);
                }
                NodeKind::LineBreak => {
                    // A newline on an empty line would end the paragraph.
                    if in_paragraph && !at_line_start && newline_safe(next) {
                        self.out.push('\n');
                        at_line_start = true;
                        continue;
                    }
                    self.out.push_str("\\\\");
                }
                NodeKind::Strong => self.wrapped("**", &node.children, in_paragraph)?,
                NodeKind::Emphasis => self.wrapped("//", &node.children, in_paragraph)?,
                NodeKind::Code(code) => {
                    self.out.push_str("##");
                    self.out.push_str(code);
                    self.out.push_str("##");
                }
                NodeKind::Link { target } => {
                    let reference = match target.kind {
                        LinkKind::Mail => format!("mailto:{}", target.reference),
                        _ => target.reference.clone(),
                    };
                    self.link(&node.children, &reference)?;
                }
                NodeKind::BrokenLink { raw } => self.link(&node.children, raw)?,
                NodeKind::Placeholder { index } => {
                    if at_line_start {
                        self.out.push('~');
                    }
                    self.out.push('{');
                    self.out.push_str(&index.to_string());
                    self.out.push('}');
                }
                other => return Err(Self::unsupported(other)),
            }
            at_line_start = false;
        }
        Ok(())
    }

    fn wrapped(&mut self, marker: &str, children: &[Node], in_paragraph: bool) -> Result<(), RenderError> {
        self.out.push_str(marker);
        self.closing_emphasis = marker == "//";
        self.inline(children, false, in_paragraph)?;
        self.out.push_str(marker);
        Ok(())
    }

    fn link(&mut self, label: &[Node], reference: &str) -> Result<(), RenderError> {
        self.out.push_str("[[");
        if !label.is_empty() {
            self.inline(label, false, false)?;
            self.out.push_str(">>");
        }
        self.out.push_str(reference);
        self.out.push_str("]]");
        Ok(())
    }
}

fn is_block_child(kind: &NodeKind) -> bool {
    !matches!(
        kind,
        NodeKind::Text(_)
            | NodeKind::Code(_)
            | NodeKind::Strong
            | NodeKind::Emphasis
            | NodeKind::Link { .. }
            | NodeKind::BrokenLink { .. }
            | NodeKind::LineBreak
            | NodeKind::Placeholder { .. }
    )
}

/// Whether a line break followed by `next` can be written as a newline
/// without the next line being blank.
fn newline_safe(next: Option<&Node>) -> bool {
    match next.map(|n| &n.kind) {
        None | Some(NodeKind::LineBreak) => false,
        Some(NodeKind::Text(text)) => text.chars().next().is_some_and(|c| !c.is_whitespace()),
        Some(_) => true,
    }
}

/// Characters that begin a block construct at the start of a line, or are
/// stripped there.
fn is_line_start_special(c: char) -> bool {
    matches!(c, '=' | '*' | '-' | '{' | '1') || c.is_whitespace()
}

/// Characters that form inline markup when doubled.
fn is_pair_marker(c: char) -> bool {
    matches!(c, '*' | '/' | '#' | '[' | '\\')
}

fn escape_text(text: &str, position: TextPosition, out: &mut String) {
    let chars: Vec<char> = text.chars().collect();
    let last = chars.len().saturating_sub(1);
    for (i, &c) in chars.iter().enumerate() {
        let next = chars.get(i + 1).copied();
        let escape = c == '~'
            || (is_pair_marker(c) && (next == Some(c) || i == last))
            || (i == 0 && position.line_start && is_line_start_special(c))
            || (i == last && position.heading_end && (c == '=' || c.is_whitespace()))
            || (i == last && position.before_emphasis && c == ':');
        if escape {
            out.push('~');
        }
        out.push(c);
    }
}

#[cfg(test)]
mod tests {
    use folio_parser::Parser;
    use folio_tree::LinkTarget;
    use pretty_assertions::assert_eq;

    use super::*;

    fn render(tree: &Node) -> Result<String, RenderError> {
        let mut out = String::new();
        WikiRenderer.render(tree, &mut out)?;
        Ok(out)
    }

    fn parse(text: &str) -> Node {
        Parser::with_defaults().parse(text, &SyntaxId::wiki()).unwrap()
    }

    fn assert_round_trip(tree: &Node) {
        let text = render(tree).unwrap();
        assert_eq!(&parse(&text), tree, "rendered as {text:?}");
    }

    #[test]
    fn test_renders_blocks() {
        let tree = Node::document(vec![
            Node::heading(2, vec![Node::text("Title")]),
            Node::paragraph(vec![
                Node::text("Some "),
                Node::strong(vec![Node::text("bold")]),
                Node::text(" and "),
                Node::emphasis(vec![Node::text("em")]),
            ]),
            Node::list(true, vec![Node::list_item(vec![Node::text("one")])]),
            Node::horizontal_rule(),
        ]);
        assert_eq!(
            render(&tree).unwrap(),
            "== Title ==\n\nSome **bold** and //em//\n\n1. one\n\n----"
        );
    }

    #[test]
    fn test_links() {
        let tree = Node::paragraph(vec![
            Node::link(LinkTarget::url("https://example.com"), vec![Node::text("site")]),
            Node::text(" "),
            Node::link(LinkTarget::mail("ada@example.com"), vec![]),
            Node::text(" "),
            Node::broken_link("{{bad}}", vec![Node::text("the guide")]),
        ]);
        assert_eq!(
            render(&tree).unwrap(),
            "[[site>>https://example.com]] [[mailto:ada@example.com]] [[the guide>>{{bad}}]]"
        );
    }

    #[test]
    fn test_macros() {
        let tree = Node::document(vec![
            Node::macro_call("toc", vec![], None),
            Node::macro_call(
                "code",
                vec![("language".to_owned(), "rust".to_owned())],
                Some("fn main() {}".to_owned()),
            ),
        ]);
        assert_eq!(
            render(&tree).unwrap(),
            "{{toc/}}\n\n{{code language=\"rust\"}}\nfn main() {}\n{{/code}}"
        );
    }

    #[test]
    fn test_escapes_markup_in_text() {
        let tree = Node::paragraph(vec![Node::text("a ** b // c ~ d [[e]]")]);
        assert_eq!(render(&tree).unwrap(), "a ~** b ~// c ~~ d ~[[e]]");
    }

    #[test]
    fn test_escapes_block_markers_at_line_start() {
        let tree = Node::paragraph(vec![
            Node::text("= not a heading"),
            Node::line_break(),
            Node::text("* not a list"),
        ]);
        assert_eq!(render(&tree).unwrap(), "~= not a heading\n~* not a list");
    }

    #[test]
    fn test_leading_line_break_keeps_backslashes() {
        let tree = Node::paragraph(vec![Node::line_break(), Node::text("text")]);
        assert_eq!(render(&tree).unwrap(), "\\\\text");
    }

    #[test]
    fn test_line_break_outside_paragraph() {
        let tree = Node::list(
            false,
            vec![Node::list_item(vec![
                Node::text("a"),
                Node::line_break(),
                Node::text("b"),
            ])],
        );
        assert_eq!(render(&tree).unwrap(), "* a\\\\b");
    }

    #[test]
    fn test_inline_macro_is_unsupported() {
        let tree = Node::paragraph(vec![Node::macro_call("toc", vec![], None)]);
        let err = render(&tree).unwrap_err();
        assert_eq!(
            err.to_string(),
            "xwiki/2.1 renderer does not support macro 'toc'"
        );
    }

    #[test]
    fn test_round_trip_of_parsed_documents() {
        let sources = [
            "== Title ==\nBody",
            "= One =\n\n====== Six ======",
            "Some **bold //nested//** text and ##code##.\nSecond line\\\\third",
            "* a\n* b\n\n1. c\n1. d",
            "Read [[the guide>>{{bad}}]] first, or [[https://example.com]].",
            "Mail [[me>>mailto:ada@example.com]] or see [[Main.WebHome]].",
            "----\n\n{{code language=\"rust\"}}\nfn main() {\n\n}\n{{/code}}\n\n{{toc/}}",
            "Escaped ~** stars, ~~ tilde, ~= and ~[[brackets]]",
            "~= starts with equals\n~* starts with star\n~---- dashes",
            "see: http://example.com and note~://emphasis//",
            "== ends with ~= ==",
            "trailing break\\\\",
            "a\\\\\\\\b",
            "~ leading space",
            "\\\\text",
            "\\\\----",
            "\\\\~~",
            "\\\\>== ",
            "Intro\n\n\\\\after a blank line",
            "~]~\n{0}",
            "ends with tilde~\nnext line",
        ];
        for source in sources {
            assert_round_trip(&parse(source));
        }
    }

    #[test]
    fn test_round_trip_of_adjacent_markers() {
        assert_round_trip(&Node::document(vec![Node::paragraph(vec![
            Node::text("a*"),
            Node::strong(vec![Node::text("b")]),
            Node::text("["),
            Node::link(LinkTarget::page("Home"), vec![]),
            Node::text("note:"),
            Node::emphasis(vec![Node::text("x:")]),
        ])]));
    }
}
