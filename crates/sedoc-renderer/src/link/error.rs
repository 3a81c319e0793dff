use miette::Diagnostic;
use thiserror::Error;

/// Failures talking to the preview or upconversion services.
///
/// These never leave the renderer: callers log them and fall back to
/// locally derived output.
#[derive(Debug, Error, Diagnostic)]
pub enum LinkServiceError {
    #[error("link services are disabled")]
    #[diagnostic(code(link::disabled))]
    Disabled,

    #[error("request to {endpoint} failed")]
    #[diagnostic(code(link::request))]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} answered with status {status}")]
    #[diagnostic(code(link::status))]
    Status { endpoint: String, status: u16 },

    #[error("could not decode response from {endpoint}")]
    #[diagnostic(code(link::decode))]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{endpoint} returned no components")]
    #[diagnostic(code(link::empty))]
    Empty { endpoint: String },
}
