//! XWiki 2.1 tokenizer.
//!
//! Supported subset:
//!
//! ```text
//! = Level 1 =            headings, up to ====== Level 6 ======
//! * item / 1. item       bulleted and ordered lists (one level)
//! ----                   horizontal rule
//! **strong** //em//      inline formatting
//! ##code##               inline monospace
//! [[label>>target]]      links, [[target]] without label
//! \\                     forced line break
//! ~x                     escape: x is literal
//! {{name k="v"}}..{{/name}}  block macro, {{name/}} without content
//! ```
//!
//! Blank lines separate blocks. Newlines inside a paragraph are line breaks.

use std::io::Read;
use std::sync::LazyLock;

use folio_tree::SyntaxId;
use regex::Regex;

use super::{Tokenizer, read_source};
use crate::error::TokenizeError;
use crate::event::{Event, Listener};

static HEADING_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(={1,6})\s*(.*?)\s*=*\s*$").expect("invalid heading regex"));

static RULE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-{4,}\s*$").expect("invalid rule regex"));

static MACRO_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\{\{([A-Za-z][\w.\-]*)((?:\s+[A-Za-z][\w\-]*="[^"]*")*)\s*(/)?\}\}"#)
        .expect("invalid macro regex")
});

static PARAM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([A-Za-z][\w\-]*)="([^"]*)""#).expect("invalid param regex"));

/// Tokenizer for `xwiki/2.1`.
#[derive(Debug, Default, Clone, Copy)]
pub struct WikiTokenizer;

impl Tokenizer for WikiTokenizer {
    fn syntax(&self) -> SyntaxId {
        SyntaxId::wiki()
    }

    fn tokenize(
        &self,
        source: &mut dyn Read,
        listener: &mut dyn Listener,
    ) -> Result<(), TokenizeError> {
        let text = read_source(source)?;
        let lines: Vec<&str> = text.lines().collect();
        BlockReader::new(listener).read(&lines)
    }
}

/// Inline formatting toggled by a two-character marker.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Format {
    Strong,
    Emphasis,
}

impl Format {
    fn marker(self) -> &'static str {
        match self {
            Self::Strong => "**",
            Self::Emphasis => "//",
        }
    }

    fn begin(self) -> Event {
        match self {
            Self::Strong => Event::BeginStrong,
            Self::Emphasis => Event::BeginEmphasis,
        }
    }

    fn end(self) -> Event {
        match self {
            Self::Strong => Event::EndStrong,
            Self::Emphasis => Event::EndEmphasis,
        }
    }
}

struct BlockReader<'l> {
    listener: &'l mut dyn Listener,
    paragraph: Vec<String>,
    paragraph_line: usize,
    list: Option<bool>,
}

impl<'l> BlockReader<'l> {
    fn new(listener: &'l mut dyn Listener) -> Self {
        Self {
            listener,
            paragraph: Vec::new(),
            paragraph_line: 0,
            list: None,
        }
    }

    fn read(mut self, lines: &[&str]) -> Result<(), TokenizeError> {
        self.emit(Event::BeginDocument)?;

        let mut i = 0;
        while i < lines.len() {
            let line = lines[i];
            let line_no = i + 1;

            if line.trim().is_empty() {
                self.close_blocks()?;
                i += 1;
            } else if let Some(caps) = HEADING_PATTERN.captures(line) {
                self.close_blocks()?;
                let level = u8::try_from(caps[1].len()).unwrap_or(6);
                self.emit(Event::BeginHeading { level })?;
                self.inline(&caps[2], line_no, true)?;
                self.emit(Event::EndHeading)?;
                i += 1;
            } else if RULE_PATTERN.is_match(line) {
                self.close_blocks()?;
                self.emit(Event::HorizontalRule)?;
                i += 1;
            } else if line.starts_with("{{") {
                self.close_blocks()?;
                i = self.macro_block(lines, i)?;
            } else if let Some((ordered, item)) = list_item(line) {
                self.flush_paragraph()?;
                if self.list != Some(ordered) {
                    self.close_list()?;
                    self.emit(Event::BeginList { ordered })?;
                    self.list = Some(ordered);
                }
                self.emit(Event::BeginListItem)?;
                self.inline(item, line_no, true)?;
                self.emit(Event::EndListItem)?;
                i += 1;
            } else {
                self.close_list()?;
                if self.paragraph.is_empty() {
                    self.paragraph_line = line_no;
                }
                self.paragraph.push(line.to_owned());
                i += 1;
            }
        }

        self.close_blocks()?;
        self.emit(Event::EndDocument)?;
        Ok(())
    }

    fn emit(&mut self, event: Event) -> Result<(), TokenizeError> {
        self.listener.on_event(event)?;
        Ok(())
    }

    fn close_blocks(&mut self) -> Result<(), TokenizeError> {
        self.flush_paragraph()?;
        self.close_list()
    }

    fn close_list(&mut self) -> Result<(), TokenizeError> {
        if self.list.take().is_some() {
            self.emit(Event::EndList)?;
        }
        Ok(())
    }

    fn flush_paragraph(&mut self) -> Result<(), TokenizeError> {
        if self.paragraph.is_empty() {
            return Ok(());
        }
        let text = std::mem::take(&mut self.paragraph).join("\n");
        self.emit(Event::BeginParagraph)?;
        self.inline(&text, self.paragraph_line, true)?;
        self.emit(Event::EndParagraph)
    }

    /// Read a macro starting at `lines[start]`; returns the index of the
    /// first line after it.
    fn macro_block(&mut self, lines: &[&str], start: usize) -> Result<usize, TokenizeError> {
        let line = lines[start];
        let caps = MACRO_PATTERN
            .captures(line)
            .ok_or_else(|| TokenizeError::malformed(start + 1, "invalid macro call"))?;
        let name = caps[1].to_owned();
        let params = PARAM_PATTERN
            .captures_iter(&caps[2])
            .map(|p| (p[1].to_owned(), p[2].to_owned()))
            .collect();
        let header_end = caps.get(0).map_or(line.len(), |m| m.end());
        let rest = &line[header_end..];

        if caps.get(3).is_some() {
            if !rest.trim().is_empty() {
                return Err(TokenizeError::malformed(
                    start + 1,
                    format!("unexpected content after macro {{{{{name}/}}}}"),
                ));
            }
            self.emit(Event::Macro {
                name,
                params,
                content: None,
            })?;
            return Ok(start + 1);
        }

        let close = format!("{{{{/{name}}}}}");
        let mut body = rest.to_owned();
        let mut end = start;
        loop {
            if let Some(pos) = body.find(&close) {
                if !body[pos + close.len()..].trim().is_empty() {
                    return Err(TokenizeError::malformed(
                        end + 1,
                        format!("unexpected content after {close}"),
                    ));
                }
                let content = &body[..pos];
                let content = content.strip_prefix('\n').unwrap_or(content);
                let content = content.strip_suffix('\n').unwrap_or(content);
                let content = Some(content.to_owned());
                self.emit(Event::Macro {
                    name,
                    params,
                    content,
                })?;
                return Ok(end + 1);
            }
            end += 1;
            if end >= lines.len() {
                return Err(TokenizeError::malformed(
                    start + 1,
                    format!("macro {{{{{name}}}}} is never closed"),
                ));
            }
            body.push('\n');
            body.push_str(lines[end]);
        }
    }

    /// Emit inline content. Newlines become line breaks.
    fn inline(&mut self, text: &str, first_line: usize, allow_links: bool) -> Result<(), TokenizeError> {
        let mut open: Vec<(Format, usize)> = Vec::new();
        let mut buf = String::new();
        let mut line = first_line;
        let mut rest = text;
        // `://` stays literal unless the colon itself was escaped.
        let mut escaped_last = false;

        while let Some(c) = rest.chars().next() {
            if c == '~' {
                // A tilde ending a line escapes nothing.
                match rest[1..].chars().next() {
                    Some(next) if next != '\n' => {
                        buf.push(next);
                        escaped_last = true;
                        rest = &rest[1 + next.len_utf8()..];
                        continue;
                    }
                    _ => {
                        buf.push('~');
                        rest = &rest[1..];
                    }
                }
            } else if c == '\n' {
                self.flush_text(&mut buf)?;
                self.emit(Event::LineBreak)?;
                line += 1;
                rest = &rest[1..];
            } else if rest.starts_with("\\\\") {
                self.flush_text(&mut buf)?;
                self.emit(Event::LineBreak)?;
                rest = &rest[2..];
            } else if rest.starts_with("**") {
                self.flush_text(&mut buf)?;
                self.toggle(Format::Strong, &mut open, line)?;
                rest = &rest[2..];
            } else if rest.starts_with("//") && !(buf.ends_with(':') && !escaped_last) {
                self.flush_text(&mut buf)?;
                self.toggle(Format::Emphasis, &mut open, line)?;
                rest = &rest[2..];
            } else if let Some(after) = rest.strip_prefix("##") {
                let end = after
                    .find("##")
                    .ok_or_else(|| TokenizeError::malformed(line, "unclosed ##"))?;
                self.flush_text(&mut buf)?;
                self.emit(Event::Code(after[..end].to_owned()))?;
                line += after[..end].matches('\n').count();
                rest = &after[end + 2..];
            } else if allow_links && rest.starts_with("[[") {
                let after = &rest[2..];
                let end = after
                    .find("]]")
                    .ok_or_else(|| TokenizeError::malformed(line, "unclosed link"))?;
                let inner = &after[..end];
                self.flush_text(&mut buf)?;
                match inner.rsplit_once(">>") {
                    Some((label, target)) => {
                        self.emit(Event::BeginLink {
                            target: target.to_owned(),
                        })?;
                        self.inline(label, line, false)?;
                    }
                    None => self.emit(Event::BeginLink {
                        target: inner.to_owned(),
                    })?,
                }
                self.emit(Event::EndLink)?;
                line += inner.matches('\n').count();
                rest = &after[end + 2..];
            } else {
                buf.push(c);
                rest = &rest[c.len_utf8()..];
            }
            escaped_last = false;
        }

        self.flush_text(&mut buf)?;
        if let Some((format, opened_at)) = open.last() {
            return Err(TokenizeError::malformed(
                *opened_at,
                format!("unclosed {}", format.marker()),
            ));
        }
        Ok(())
    }

    fn toggle(
        &mut self,
        format: Format,
        open: &mut Vec<(Format, usize)>,
        line: usize,
    ) -> Result<(), TokenizeError> {
        match open.last() {
            Some((top, _)) if *top == format => {
                open.pop();
                self.emit(format.end())
            }
            _ if open.iter().any(|(f, _)| *f == format) => Err(TokenizeError::malformed(
                line,
                format!("overlapping {} formatting", format.marker()),
            )),
            _ => {
                open.push((format, line));
                self.emit(format.begin())
            }
        }
    }

    fn flush_text(&mut self, buf: &mut String) -> Result<(), TokenizeError> {
        if buf.is_empty() {
            return Ok(());
        }
        let text = std::mem::take(buf);
        self.emit(Event::Text(text))
    }
}

/// Split a list item line into `(ordered, content)`.
fn list_item(line: &str) -> Option<(bool, &str)> {
    if let Some(item) = line.strip_prefix("* ") {
        Some((false, item.trim_start()))
    } else {
        line.strip_prefix("1. ").map(|item| (true, item.trim_start()))
    }
}
