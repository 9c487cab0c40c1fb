//! Markdown rendering with `@handle` mention support
//!
//! The renderer is pure: it never performs I/O. Mention resolution is
//! supplied from outside through a `MentionLinker`.

mod inline;
mod render;

pub use inline::{segments, Segment};
pub use render::{MarkdownRenderer, MentionLinker, Rendered};
