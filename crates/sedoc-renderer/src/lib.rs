//! sedoc renderer
//!
//! Turns the editor's Markdown dialect into the component array the blog
//! editor accepts, and wraps it into a request payload.
//!
//! ```text
//! markdown --parse--> blocks --synthesize--> components --envelope--> payload
//! ```
//!
//! Nothing in here fails on bad input: malformed markup degrades to plain
//! text and unreachable link services degrade to locally derived previews.

pub mod document;
pub mod envelope;
pub mod link;
pub mod markdown;

pub use document::{Component, ComponentKind, DocumentSynthesizer, SynthesisOptions};
pub use envelope::{DocumentModel, PopulationParams, PostSettings, RequestPayload};
pub use link::{HttpLinkServices, LinkKind, LinkPreview, LinkPreviewResolver, Upconverter};
pub use markdown::{Block, ParsedDocument, StyledRun, parse, tokenize};

/// Parse and synthesize in one go.
pub async fn markdown_to_components<S>(
    markdown: &str,
    synthesizer: &DocumentSynthesizer<S>,
) -> Vec<Component>
where
    S: LinkPreviewResolver + Upconverter,
{
    let document = parse(markdown);
    synthesizer.synthesize_document(&document).await
}
