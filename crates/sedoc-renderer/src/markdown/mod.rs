//! The editor's Markdown dialect: block structure and inline styling.

mod block;
mod inline;

pub use block::{Block, DEFAULT_TITLE, ParsedDocument, parse};
pub use inline::{RunStyle, StyledRun, plain_text, tokenize};
