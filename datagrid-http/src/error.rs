//! Error types

use std::time::Duration;

use datagrid::FetchError;

/// Errors from talking to a list endpoint.
#[derive(Debug, thiserror::Error)]
pub enum HttpSourceError {
    /// Non-success response from the backend.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body, or a description of the failure.
        message: String,
    },

    /// Network error during the request.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// Invalid base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The body was not a `{"data": [...], "total": n}` envelope.
    #[error("Response parse error: {message}")]
    Parse {
        message: String,
        /// Raw response body, if available.
        body: Option<String>,
    },
}

impl HttpSourceError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: None,
        }
    }

    /// Creates a parse error keeping the raw response body.
    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::Network(_) => true,
            Self::Timeout(_) => true,
            _ => false,
        }
    }
}

impl From<HttpSourceError> for FetchError {
    fn from(err: HttpSourceError) -> Self {
        match err {
            HttpSourceError::Http { status, message } => FetchError::backend_status(status, message),
            HttpSourceError::Timeout(after) => FetchError::Timeout(after),
            HttpSourceError::Parse { message, .. } => FetchError::Decode(message),
            other => FetchError::other(other.to_string()),
        }
    }
}
