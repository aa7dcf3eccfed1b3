//! `CommonMark` tokenizer backed by `pulldown-cmark`.

use std::io::Read;

use folio_tree::SyntaxId;
use pulldown_cmark::{CodeBlockKind, Event as MdEvent, HeadingLevel, Options, Parser, Tag, TagEnd};

use super::{Tokenizer, read_source};
use crate::error::TokenizeError;
use crate::event::{Event, Listener};

/// Tokenizer for `markdown/1.2`.
///
/// Maps `pulldown-cmark` events onto structural events. Fenced and indented
/// code blocks become `code` macros carrying the fence language as a
/// `language` parameter. Constructs without a tree counterpart (block quotes,
/// images, tables) are flattened: their text content is kept, their
/// container is dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownTokenizer;

impl Tokenizer for MarkdownTokenizer {
    fn syntax(&self) -> SyntaxId {
        SyntaxId::markdown()
    }

    fn tokenize(
        &self,
        source: &mut dyn Read,
        listener: &mut dyn Listener,
    ) -> Result<(), TokenizeError> {
        let text = read_source(source)?;
        let parser = Parser::new_ext(&text, Options::ENABLE_STRIKETHROUGH);

        listener.on_event(Event::BeginDocument)?;
        let mut code_block: Option<(Vec<(String, String)>, String)> = None;

        for event in parser {
            if let Some((_, buffer)) = code_block.as_mut() {
                match event {
                    MdEvent::Text(text) => buffer.push_str(&text),
                    MdEvent::End(TagEnd::CodeBlock) => {
                        if let Some((params, mut content)) = code_block.take() {
                            if content.ends_with('\n') {
                                content.pop();
                            }
                            listener.on_event(Event::Macro {
                                name: "code".to_owned(),
                                params,
                                content: Some(content),
                            })?;
                        }
                    }
                    _ => {}
                }
                continue;
            }

            let mapped = match event {
                MdEvent::Start(tag) => match tag {
                    Tag::Paragraph => Some(Event::BeginParagraph),
                    Tag::Heading { level, .. } => Some(Event::BeginHeading {
                        level: heading_level_to_num(level),
                    }),
                    Tag::List(start) => Some(Event::BeginList {
                        ordered: start.is_some(),
                    }),
                    Tag::Item => Some(Event::BeginListItem),
                    Tag::Emphasis => Some(Event::BeginEmphasis),
                    Tag::Strong => Some(Event::BeginStrong),
                    Tag::Link { dest_url, .. } => Some(Event::BeginLink {
                        target: dest_url.into_string(),
                    }),
                    Tag::CodeBlock(kind) => {
                        let params = match kind {
                            CodeBlockKind::Fenced(info) => {
                                let lang = info.split_whitespace().next().unwrap_or_default();
                                if lang.is_empty() {
                                    Vec::new()
                                } else {
                                    vec![("language".to_owned(), lang.to_owned())]
                                }
                            }
                            CodeBlockKind::Indented => Vec::new(),
                        };
                        code_block = Some((params, String::new()));
                        None
                    }
                    _ => None,
                },
                MdEvent::End(tag) => match tag {
                    TagEnd::Paragraph => Some(Event::EndParagraph),
                    TagEnd::Heading(_) => Some(Event::EndHeading),
                    TagEnd::List(_) => Some(Event::EndList),
                    TagEnd::Item => Some(Event::EndListItem),
                    TagEnd::Emphasis => Some(Event::EndEmphasis),
                    TagEnd::Strong => Some(Event::EndStrong),
                    TagEnd::Link => Some(Event::EndLink),
                    _ => None,
                },
                MdEvent::Text(text) | MdEvent::Html(text) | MdEvent::InlineHtml(text) => {
                    Some(Event::Text(text.into_string()))
                }
                MdEvent::Code(code) => Some(Event::Code(code.into_string())),
                MdEvent::SoftBreak => Some(Event::Text(" ".to_owned())),
                MdEvent::HardBreak => Some(Event::LineBreak),
                MdEvent::Rule => Some(Event::HorizontalRule),
                _ => None,
            };

            if let Some(event) = mapped {
                listener.on_event(event)?;
            }
        }

        listener.on_event(Event::EndDocument)?;
        Ok(())
    }
}

/// Convert heading level enum to number (1-6).
fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
