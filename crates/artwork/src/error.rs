//! Provider error types.

/// Errors from image providers.
///
/// An HTTP error status is not an error here; providers report it as a
/// miss. These variants mean the endpoint could not be talked to at all.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid API key")]
    InvalidKey,
}
