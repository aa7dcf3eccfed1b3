//! CLI command implementations.

pub(crate) mod render;
pub(crate) mod syntaxes;
pub(crate) mod translate;

pub(crate) use render::RenderArgs;
pub(crate) use translate::TranslateArgs;
