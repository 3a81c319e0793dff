//! Link handling: shape-based classification, preview cards and the HTTP
//! services behind them.

mod classify;
mod client;
mod error;
mod preview;

pub use classify::{IMAGE_EXTENSIONS, IMAGE_HOST_TOKENS, LinkKind, VIDEO_HOST_TOKENS, classify};
pub use client::{HttpLinkServices, LinkPreviewResolver, Upconverter, anchor_html};
pub use error::LinkServiceError;
pub use preview::{LinkPreview, fallback_preview, resolve_preview, youtube_video_id};
