//! HTTP transport layer.
//!
//! The analyzer talks to the chat-completion endpoint through the
//! [`HttpTransport`] trait so tests can swap the network out.

mod http;

pub use http::{HttpRequest, HttpResponse, HttpTransport, HttpTransportImpl};

use std::time::Duration;

/// Transport error types.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection error.
    #[error("Connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Timeout error.
    #[error("Timeout after {timeout:?}")]
    Timeout {
        /// Timeout duration, if one was configured.
        timeout: Option<Duration>,
    },

    /// Invalid response.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Error message.
        message: String,
    },
}

impl From<TransportError> for crate::errors::AnalysisError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout { .. } => crate::errors::AnalysisError::Timeout {
                message: err.to_string(),
            },
            _ => crate::errors::AnalysisError::Transport {
                message: err.to_string(),
            },
        }
    }
}
