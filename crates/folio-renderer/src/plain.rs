//! Plain text renderer.

use folio_tree::{Node, NodeKind, SyntaxId};

use crate::renderer::{BlockRun, RenderError, Renderer, block_runs};

/// Renderer for `plain/1.0`.
///
/// Writes the readable text of a tree and drops all markup. Blocks are
/// separated by a blank line, list items go on their own lines and line
/// breaks become newlines.
///
/// This renderer never fails. Constructs without a plain text form pass
/// through as the text of their children:
///
/// - links and broken links render their label, or their reference when
///   unlabelled
/// - macros render their raw content, if any
/// - placeholders render as `{n}`
/// - horizontal rules render nothing
///
/// The output is lossy: parsing it back as `plain/1.0` yields paragraphs
/// only.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainRenderer;

impl Renderer for PlainRenderer {
    fn syntax(&self) -> SyntaxId {
        SyntaxId::plain()
    }

    fn render(&self, tree: &Node, out: &mut String) -> Result<(), RenderError> {
        let mut blocks = Vec::new();
        collect_blocks(std::slice::from_ref(tree), &mut blocks);
        out.push_str(&blocks.join("\n\n"));
        Ok(())
    }
}

fn collect_blocks(nodes: &[Node], blocks: &mut Vec<String>) {
    for run in block_runs(nodes) {
        match run {
            BlockRun::Inline(nodes) => push_block(blocks, inline_text(nodes)),
            BlockRun::Block(node) => match &node.kind {
                NodeKind::Heading { .. } | NodeKind::Paragraph => {
                    push_block(blocks, inline_text(&node.children));
                }
                NodeKind::List { .. } => {
                    let items: Vec<String> = node.children.iter().map(item_text).collect();
                    push_block(blocks, items.join("\n"));
                }
                NodeKind::ListItem => push_block(blocks, item_text(node)),
                NodeKind::HorizontalRule => {}
                NodeKind::Macro { content, .. } => {
                    if let Some(content) = content {
                        push_block(blocks, content.clone());
                    }
                }
                _ => collect_blocks(&node.children, blocks),
            },
        }
    }
}

fn push_block(blocks: &mut Vec<String>, text: String) {
    if !text.is_empty() {
        blocks.push(text);
    }
}

/// Text of a list item; nested blocks are joined with spaces.
fn item_text(item: &Node) -> String {
    let mut parts = Vec::new();
    collect_blocks(&item.children, &mut parts);
    parts.join(" ")
}

fn inline_text(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_inline(node, &mut out);
    }
    out
}

fn write_inline(node: &Node, out: &mut String) {
    match &node.kind {
        NodeKind::Text(text) | NodeKind::Code(text) => out.push_str(text),
        NodeKind::LineBreak => out.push('\n'),
        NodeKind::Placeholder { index } => {
            out.push('{');
            out.push_str(&index.to_string());
            out.push('}');
        }
        NodeKind::Link { target } if node.children.is_empty() => out.push_str(&target.reference),
        NodeKind::BrokenLink { raw } if node.children.is_empty() => out.push_str(raw),
        NodeKind::Macro { content, .. } => {
            if let Some(content) = content {
                out.push_str(content);
            }
        }
        _ => {
            for child in &node.children {
                write_inline(child, out);
            }
        }
    }
}
