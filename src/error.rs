//! Scanner error types

use std::time::Duration;

/// Scanner error types.
///
/// Errors are `Clone` so a single failed model call can be handed to every
/// caller that was waiting on the same in-flight request.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ScannerError {
    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("model not found: {0}")]
    ModelNotFound(String),

    #[error("empty response from model")]
    EmptyResponse,

    /// The model answered, but not with parseable JSON.
    ///
    /// `raw` carries the model text so callers can diagnose the failure.
    #[error("model returned invalid JSON: {message}")]
    InvalidModelOutput { message: String, raw: String },

    // Request errors
    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    // Local data errors
    #[error("JSON error: {0}")]
    Json(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl ScannerError {
    /// Whether the error originates from the model provider rather than
    /// from this service or its caller.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            ScannerError::Http(_)
                | ScannerError::Api { .. }
                | ScannerError::RateLimited { .. }
                | ScannerError::AuthenticationFailed
                | ScannerError::ModelNotFound(_)
                | ScannerError::EmptyResponse
                | ScannerError::InvalidModelOutput { .. }
        )
    }
}

impl From<serde_json::Error> for ScannerError {
    fn from(err: serde_json::Error) -> Self {
        ScannerError::Json(err.to_string())
    }
}

impl From<std::io::Error> for ScannerError {
    fn from(err: std::io::Error) -> Self {
        ScannerError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for ScannerError {
    fn from(err: reqwest::Error) -> Self {
        ScannerError::Http(err.to_string())
    }
}

/// Result type alias for scanner operations
pub type Result<T> = std::result::Result<T, ScannerError>;
