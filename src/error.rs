//! Error types and handling.

use reqwest::StatusCode;
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Transport-level HTTP failure (connect, timeout, decode)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("{message} (HTTP {status})")]
    Status { status: StatusCode, message: String },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Create a validation error with message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a status error with message
    pub fn status(status: StatusCode, msg: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: msg.into(),
        }
    }

    /// Short text for the UI, without the technical wrapper.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            Self::Validation(message) => message.clone(),
            Self::Http(e) if e.is_timeout() => "Request timed out".to_string(),
            Self::Http(e) if e.is_connect() => "Cannot reach the attendance server".to_string(),
            Self::Http(e) if e.is_decode() => "Unexpected response from the attendance server".to_string(),
            Self::Http(_) => "Network error".to_string(),
        }
    }
}
