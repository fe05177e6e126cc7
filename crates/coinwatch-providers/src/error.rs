//! Error types for the provider clients.

use thiserror::Error;

/// Result type alias for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Errors raised by the REST provider clients.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status.
    #[error("API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// Response body did not match the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider throttled the request and retries were exhausted.
    #[error("rate limited (retry after {retry_after_ms:?} ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    /// Structurally valid JSON with semantically invalid content.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// True for failures worth retrying on a different provider.
    pub fn is_transient(&self) -> bool {
        !matches!(self, ProviderError::InvalidResponse(_))
    }
}
