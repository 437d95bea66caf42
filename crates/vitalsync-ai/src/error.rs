//! Error types for AI operations.

use std::time::Duration;

use thiserror::Error;

/// Errors from talking to the remote model.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Request did not complete in time.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// No API key configured.
    #[error("missing API key - set GEMINI_API_KEY environment variable")]
    MissingApiKey,

    /// API key cannot be sent as a header value.
    #[error("API key contains characters that are not valid in an HTTP header")]
    InvalidApiKey,
}

/// Errors from preparing or running an assistant request.
#[derive(Debug, Error)]
pub enum AIError {
    #[error("client error: {0}")]
    Client(#[from] ClientError),

    /// There is no message to answer.
    #[error("conversation history is empty")]
    EmptyHistory,
}
