//! Error types for sedoc

use miette::Diagnostic;

/// Main error type for sedoc operations
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum SedocError {
    /// Unknown link handling mode
    #[error("unknown link mode `{0}` (expected one of: upconvert, simple, oglink)")]
    #[diagnostic(code(sedoc::link_mode))]
    InvalidLinkMode(String),

    /// Unknown video handling strategy
    #[error("unknown video strategy `{0}` (expected one of: embed, hyperlink)")]
    #[diagnostic(code(sedoc::video_strategy))]
    InvalidVideoStrategy(String),

    /// Unknown oglink card source
    #[error("unknown oglink source `{0}` (expected one of: fallback, live)")]
    #[diagnostic(code(sedoc::oglink_source))]
    InvalidOglinkSource(String),

    /// Configuration could not be loaded or saved
    #[error("configuration error: {0}")]
    #[diagnostic(code(sedoc::config))]
    Config(String),

    /// IO error
    #[error(transparent)]
    #[diagnostic(code(sedoc::io))]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error(transparent)]
    #[diagnostic_source]
    Serde(#[from] SerDeError),

    /// HTTP client error
    #[error(transparent)]
    #[diagnostic(code(sedoc::http))]
    Http(#[from] reqwest::Error),
}

/// Serialization/deserialization errors
#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum SerDeError {
    #[error(transparent)]
    #[diagnostic(code(sedoc::serde::json))]
    Json(#[from] serde_json::Error),
}

impl From<serde_json::Error> for SedocError {
    fn from(err: serde_json::Error) -> Self {
        SedocError::Serde(SerDeError::Json(err))
    }
}
