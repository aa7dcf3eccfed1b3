//! Structural events emitted by tokenizers.

use crate::error::StructuralError;

/// One structural event of a parsed source.
///
/// `Begin*`/`End*` pairs must nest properly; the stream of a whole source is
/// wrapped in `BeginDocument`/`EndDocument`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    BeginDocument,
    EndDocument,
    BeginSection { level: u8 },
    EndSection,
    BeginHeading { level: u8 },
    EndHeading,
    BeginParagraph,
    EndParagraph,
    BeginList { ordered: bool },
    EndList,
    BeginListItem,
    EndListItem,
    BeginEmphasis,
    EndEmphasis,
    BeginStrong,
    EndStrong,
    /// Link with its raw, unvalidated target.
    BeginLink { target: String },
    EndLink,
    Text(String),
    Code(String),
    LineBreak,
    HorizontalRule,
    Macro {
        name: String,
        params: Vec<(String, String)>,
        content: Option<String>,
    },
}

impl Event {
    /// Short name used in error messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::BeginDocument => "begin document",
            Self::EndDocument => "end document",
            Self::BeginSection { .. } => "begin section",
            Self::EndSection => "end section",
            Self::BeginHeading { .. } => "begin heading",
            Self::EndHeading => "end heading",
            Self::BeginParagraph => "begin paragraph",
            Self::EndParagraph => "end paragraph",
            Self::BeginList { .. } => "begin list",
            Self::EndList => "end list",
            Self::BeginListItem => "begin list item",
            Self::EndListItem => "end list item",
            Self::BeginEmphasis => "begin emphasis",
            Self::EndEmphasis => "end emphasis",
            Self::BeginStrong => "begin strong",
            Self::EndStrong => "end strong",
            Self::BeginLink { .. } => "begin link",
            Self::EndLink => "end link",
            Self::Text(_) => "text",
            Self::Code(_) => "code",
            Self::LineBreak => "line break",
            Self::HorizontalRule => "horizontal rule",
            Self::Macro { .. } => "macro",
        }
    }
}

/// Receiver of structural events.
pub trait Listener {
    /// Handle one event.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralError`] when the event cannot occur at this point of
    /// the stream.
    fn on_event(&mut self, event: Event) -> Result<(), StructuralError>;
}
