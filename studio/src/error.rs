//! Error types for the Pictor studio SDK.

use thiserror::Error;

/// Result type alias for studio operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for image generation and attribution operations.
#[derive(Error, Debug)]
pub enum Error {
    /// API error returned by the upstream service.
    #[error("api: {message} (status={status}, type={error_type})")]
    Api {
        status: u16,
        message: String,
        error_type: String,
        code: String,
    },

    /// HTTP request error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The request was rejected before being sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Creates a new API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Error::Api {
            status,
            message: message.into(),
            error_type: String::new(),
            code: String::new(),
        }
    }

    /// Creates a new API error carrying the upstream error type and code.
    pub fn api_with_type(
        status: u16,
        message: impl Into<String>,
        error_type: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Error::Api {
            status,
            message: message.into(),
            error_type: error_type.into(),
            code: code.into(),
        }
    }

    /// Returns true if this is a rate limit error.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Error::Api { status: 429, .. })
    }

    /// Returns true if this is an invalid API key error.
    pub fn is_invalid_api_key(&self) -> bool {
        match self {
            Error::Api { status, code, .. } => *status == 401 || code == "invalid_api_key",
            _ => false,
        }
    }

    /// Returns true if this is a server-side error.
    pub fn is_server_error(&self) -> bool {
        match self {
            Error::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns true if the request can be retried.
    pub fn is_retryable(&self) -> bool {
        self.is_rate_limit() || self.is_server_error()
    }
}
