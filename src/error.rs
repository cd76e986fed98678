//! Error types for OpenProject API operations.

use thiserror::Error;

/// Errors that can occur during OpenProject API operations.
#[derive(Debug, Error)]
pub enum OpenProjectError {
    /// Configuration is missing or incomplete.
    #[error("OpenProject configuration required: {0}")]
    ConfigMissing(String),

    /// A filter expression could not be parsed.
    #[error("Invalid filter '{0}': expected format like 'status=21' or 'subject~release'")]
    InvalidFilter(String),

    /// A command line argument is invalid for the requested operation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An API href was empty or malformed.
    #[error("Invalid href '{0}'")]
    InvalidHref(String),

    /// Entity not found.
    #[error("{entity_type} '{id}' not found")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// API request failed.
    #[error("OpenProject API error: {message}")]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    /// Authentication could not be established.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// JWT signing error.
    #[error("Failed to sign request: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Local I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The operation was cancelled before it completed.
    #[error("Operation cancelled")]
    Cancelled,

    /// A page fetched during an automatic page turn failed.
    #[error("Failed to fetch page {page}: {source}")]
    PageFailed {
        page: u32,
        #[source]
        source: Box<OpenProjectError>,
    },

    /// A page fetch task panicked or was aborted.
    #[error("Page {page} fetch task failed: {message}")]
    TaskFailed { page: u32, message: String },
}

impl OpenProjectError {
    /// HTTP status code of the failed request, if the server answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { status_code, .. } => *status_code,
            Self::NotFound { .. } => Some(404),
            Self::RateLimited { .. } => Some(429),
            Self::HttpError(e) => e.status().map(|s| s.as_u16()),
            Self::PageFailed { source, .. } => source.status_code(),
            _ => None,
        }
    }

    /// Convert a generic 404 API error into [`OpenProjectError::NotFound`].
    pub(crate) fn into_not_found(self, entity_type: &'static str, id: impl ToString) -> Self {
        match self {
            Self::ApiError {
                status_code: Some(404),
                ..
            } => Self::NotFound {
                entity_type,
                id: id.to_string(),
            },
            other => other,
        }
    }
}

/// Result type alias for OpenProject operations.
pub type Result<T> = core::result::Result<T, OpenProjectError>;
