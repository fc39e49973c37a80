//! Error types for screen intent analysis.
//!
//! Every failure the analyzer can hit, from a missing screenshot to a reply
//! the model wrapped in prose, is one variant of [`AnalysisError`]. The
//! analyzer collapses them into a single `{"error": ...}` shape at its
//! boundary, but internally they stay distinct.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Result type alias for analysis operations.
pub type IntentResult<T> = Result<T, AnalysisError>;

/// Error type for image encoding, the chat-completion call and reply parsing.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The image path does not resolve to a file.
    #[error("image file not found: {}", path.display())]
    FileNotFound {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// The image exists but could not be read.
    #[error("failed to read image {}: {message}", path.display())]
    ImageRead {
        /// The path that was read.
        path: PathBuf,
        /// Underlying I/O error message.
        message: String,
    },

    /// Analysis was requested for an image whose encoding failed.
    #[error("image encoding failed")]
    EncodingFailed,

    /// Invalid configuration (base URL, model, token cap).
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message describing the configuration issue.
        message: String,
    },

    /// The service rejected the credentials (HTTP 401/403).
    #[error("Authentication failed: {message}")]
    Authentication {
        /// Error message from the API.
        message: String,
    },

    /// The service rate limited the request (HTTP 429).
    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        /// Error message from the API.
        message: String,
        /// Value of the `retry-after` header, if sent.
        retry_after: Option<Duration>,
    },

    /// Server-side failure (HTTP 5xx).
    #[error("Server error (HTTP {status_code}): {message}")]
    Server {
        /// HTTP status code.
        status_code: u16,
        /// Error message.
        message: String,
    },

    /// Any other non-success status.
    #[error("API error (HTTP {status_code}): {message}")]
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Error message.
        message: String,
    },

    /// Connection, TLS or protocol failure below HTTP.
    #[error("Network error: {message}")]
    Transport {
        /// Error message.
        message: String,
    },

    /// The request did not complete in time.
    #[error("Request timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
    },

    /// The response body or the model's reply was not the expected JSON.
    #[error("Malformed response: {message}")]
    MalformedResponse {
        /// What was wrong with it.
        message: String,
    },
}

impl AnalysisError {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        AnalysisError::Configuration {
            message: message.into(),
        }
    }

    /// Creates a malformed response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        AnalysisError::MalformedResponse {
            message: message.into(),
        }
    }

    /// Maps an I/O error raised while reading `path`.
    pub fn from_io(path: &Path, err: &std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            AnalysisError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            AnalysisError::ImageRead {
                path: path.to_path_buf(),
                message: err.to_string(),
            }
        }
    }

    /// Returns true for failures that happened before any network call.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            AnalysisError::FileNotFound { .. }
                | AnalysisError::ImageRead { .. }
                | AnalysisError::EncodingFailed
                | AnalysisError::Configuration { .. }
        )
    }

    /// Returns true if the service rejected the credentials.
    pub fn is_authentication_error(&self) -> bool {
        matches!(self, AnalysisError::Authentication { .. })
    }

    /// Returns the retry-after duration if available.
    ///
    /// Nothing in this crate retries; the value is only surfaced in logs.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            AnalysisError::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// Error body returned by OpenAI-compatible APIs.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// The error details.
    pub error: ApiErrorDetail,
}

/// Error detail inside [`ApiErrorResponse`].
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    /// The error message.
    pub message: String,
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::MalformedResponse {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for AnalysisError {
    fn from(err: url::ParseError) -> Self {
        AnalysisError::Configuration {
            message: format!("Invalid URL: {}", err),
        }
    }
}
