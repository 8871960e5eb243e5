use thiserror::Error;

/// Error types that can occur when driving the harness.
///
/// Tool execution failures are deliberately absent: a tool implementation
/// recovers its own failures into an error payload (see
/// [`crate::registry::error_payload`]) so the orchestration loop never has to
/// abort because a single tool call went wrong.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// Missing or invalid credential. Fatal; surfaced before any request.
    #[error("Auth Error: {0}")]
    AuthError(String),

    /// The provider answered with a non-success status.
    #[error("Provider Error: {0}")]
    ProviderError(String),

    /// Transport-level failure.
    #[error("HTTP Error: {0}")]
    HttpError(String),

    /// The provider answered 2xx but the body was not what we expected.
    #[error("Response Format Error: {message}. Raw response: '{raw_response}'")]
    ResponseFormatError {
        message: String,
        raw_response: String,
    },

    /// Handles JSON serialization and deserialization errors.
    #[error("JSON Error")]
    JsonError(#[from] serde_json::Error),

    /// Handles errors from parsing URLs.
    #[error("Invalid URL")]
    InvalidUrl(#[from] url::ParseError),

    /// Handles standard I/O errors.
    #[error("I/O Error")]
    IoError(#[from] std::io::Error),
}

impl From<reqwest::Error> for HarnessError {
    fn from(err: reqwest::Error) -> Self {
        HarnessError::HttpError(err.to_string())
    }
}

impl From<http::Error> for HarnessError {
    fn from(err: http::Error) -> Self {
        HarnessError::HttpError(err.to_string())
    }
}
