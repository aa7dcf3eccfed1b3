//! HTML renderer.

use folio_tree::{LinkKind, Node, NodeKind, SyntaxId};

use crate::renderer::{BlockRun, RenderError, Renderer, block_runs};

/// Renderer for `html/5.0`.
///
/// Produces an HTML fragment (no `<html>` or `<body>` wrapper) with all text
/// escaped. Top-level blocks are separated by newlines.
///
/// - broken links render as `<span class="wikilink-broken">` around their
///   label
/// - `code` macros render as `<pre><code class="language-…">`
/// - other macros and placeholders fail with
///   [`RenderError::UnsupportedNode`]
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn syntax(&self) -> SyntaxId {
        SyntaxId::html()
    }

    fn render(&self, tree: &Node, out: &mut String) -> Result<(), RenderError> {
        blocks(std::slice::from_ref(tree), out)
    }
}

/// Escape special HTML characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

fn unsupported(kind: &NodeKind) -> RenderError {
    RenderError::unsupported(SyntaxId::html(), kind)
}

fn blocks(nodes: &[Node], out: &mut String) -> Result<(), RenderError> {
    for (i, run) in block_runs(nodes).into_iter().enumerate() {
        if i > 0 && !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        match run {
            BlockRun::Inline(nodes) => inline(nodes, out)?,
            BlockRun::Block(node) => block(node, out)?,
        }
    }
    Ok(())
}

fn block(node: &Node, out: &mut String) -> Result<(), RenderError> {
    match &node.kind {
        NodeKind::Document | NodeKind::Fragment => blocks(&node.children, out)?,
        NodeKind::Section { .. } => {
            out.push_str("<section>\n");
            blocks(&node.children, out)?;
            out.push_str("\n</section>");
        }
        NodeKind::Heading { level } => {
            let level = (*level).clamp(1, 6);
            out.push_str(&format!("<h{level}>"));
            inline(&node.children, out)?;
            out.push_str(&format!("</h{level}>"));
        }
        NodeKind::Paragraph => {
            out.push_str("<p>");
            inline(&node.children, out)?;
            out.push_str("</p>");
        }
        NodeKind::List { ordered } => {
            let tag = if *ordered { "ol" } else { "ul" };
            out.push_str(&format!("<{tag}>\n"));
            for item in &node.children {
                block(item, out)?;
                out.push('\n');
            }
            out.push_str(&format!("</{tag}>"));
        }
        NodeKind::ListItem => {
            out.push_str("<li>");
            for run in block_runs(&node.children) {
                match run {
                    BlockRun::Inline(nodes) => inline(nodes, out)?,
                    BlockRun::Block(child) => block(child, out)?,
                }
            }
            out.push_str("</li>");
        }
        NodeKind::HorizontalRule => out.push_str("<hr>"),
        NodeKind::Macro { .. } => code_macro(node, out)?,
        other => return Err(unsupported(other)),
    }
    Ok(())
}

fn code_macro(node: &Node, out: &mut String) -> Result<(), RenderError> {
    let NodeKind::Macro {
        name,
        params,
        content,
    } = &node.kind
    else {
        return Err(unsupported(&node.kind));
    };
    if name != "code" {
        return Err(unsupported(&node.kind));
    }

    let language = params
        .iter()
        .find(|(key, _)| key == "language")
        .map(|(_, value)| value.as_str());
    match language {
        Some(lang) => out.push_str(&format!(
            r#"<pre><code class="language-{}">"#,
            escape_html(lang)
        )),
        None => out.push_str("<pre><code>"),
    }
    out.push_str(&escape_html(content.as_deref().unwrap_or_default()));
    out.push_str("</code></pre>");
    Ok(())
}

fn inline(nodes: &[Node], out: &mut String) -> Result<(), RenderError> {
    for node in nodes {
        match &node.kind {
            NodeKind::Text(text) => out.push_str(&escape_html(text)),
            NodeKind::Code(code) => {
                out.push_str("<code>");
                out.push_str(&escape_html(code));
                out.push_str("</code>");
            }
            NodeKind::Strong => wrapped("strong", &node.children, out)?,
            NodeKind::Emphasis => wrapped("em", &node.children, out)?,
            NodeKind::LineBreak => out.push_str("<br>"),
            NodeKind::Link { target } => {
                let href = match target.kind {
                    LinkKind::Mail => format!("mailto:{}", target.reference),
                    _ => target.reference.clone(),
                };
                out.push_str(&format!(r#"<a href="{}">"#, escape_html(&href)));
                if node.children.is_empty() {
                    out.push_str(&escape_html(&target.reference));
                } else {
                    inline(&node.children, out)?;
                }
                out.push_str("</a>");
            }
            NodeKind::BrokenLink { raw } => {
                out.push_str(r#"<span class="wikilink-broken">"#);
                if node.children.is_empty() {
                    out.push_str(&escape_html(raw));
                } else {
                    inline(&node.children, out)?;
                }
                out.push_str("</span>");
            }
            NodeKind::Macro { .. } => code_macro(node, out)?,
            other => return Err(unsupported(other)),
        }
    }
    Ok(())
}

fn wrapped(tag: &str, children: &[Node], out: &mut String) -> Result<(), RenderError> {
    out.push_str(&format!("<{tag}>"));
    inline(children, out)?;
    out.push_str(&format!("</{tag}>"));
    Ok(())
}
