//! Error types

use std::time::Duration;

/// Errors a data source can report for a single page fetch.
///
/// Any of these sends the grid down its generic failure path: a
/// notification is raised and the last good page stays on screen.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    /// The backend answered, but not with a page.
    #[error("Backend error: {message}")]
    Backend {
        /// HTTP-like status code, if the backend has one.
        status: Option<u16>,
        /// Error message.
        message: String,
    },

    /// The data source gave up waiting.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// The response could not be decoded into records.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

impl FetchError {
    /// Creates a backend error without a status code.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            status: None,
            message: message.into(),
        }
    }

    /// Creates a backend error with a status code.
    pub fn backend_status(status: u16, message: impl Into<String>) -> Self {
        Self::Backend {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Creates a catch-all error.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// Returns the status code if this is a backend error that carried one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Backend { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<String> for FetchError {
    fn from(message: String) -> Self {
        Self::Other(message)
    }
}

impl From<&str> for FetchError {
    fn from(message: &str) -> Self {
        Self::Other(message.to_string())
    }
}

/// Errors raised while validating or loading a [`GridConfig`](crate::GridConfig).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `page_size` was zero.
    #[error("page size must be greater than zero")]
    ZeroPageSize,

    /// `page_size_options` was empty.
    #[error("page size options must not be empty")]
    EmptyPageSizeOptions,

    /// `page_size_options` contained a zero.
    #[error("page size options must not contain zero")]
    ZeroPageSizeOption,

    /// Strict page sizes are on but the initial page size is not one of the options.
    #[error("page size {0} is not one of the allowed page sizes")]
    PageSizeNotAllowed(u32),

    /// The configuration document could not be parsed.
    #[error("invalid grid config: {0}")]
    Parse(String),
}
