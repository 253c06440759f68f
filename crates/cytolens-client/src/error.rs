//! Error types for cytolens-client
//!
//! This module provides error handling for every operation the client
//! performs against the cell-test service.

use crate::types::ValidationError;

/// Result type for all operations in this crate.
///
/// This is a convenience type alias that defaults to using [`Error`] as the error type.
/// Most functions in this crate return this type for consistent error handling.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unified error type for cell-test client operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP client/connection errors
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors when sending or receiving data
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// API error response
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Input rejected before any network call was issued
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An operation was attempted against an artifact or run in the wrong
    /// lifecycle state
    #[error("Invalid state for {operation}: {reason}")]
    State { operation: String, reason: String },

    /// Invalid configuration
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },
}

impl Error {
    /// Create an API error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a validation error for a single field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(ValidationError::single(field, message))
    }

    /// Create a lifecycle state error
    pub fn state(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::State {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Returns whether this error was raised locally, before any network call
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// Check if this error is retryable
    ///
    /// The client never retries by itself; callers use this to decide whether
    /// a re-submission is worth offering.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(err) => err.is_timeout() || err.is_connect(),
            Error::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Get a user-friendly error message suitable for display
    pub fn user_message(&self) -> String {
        match self {
            Error::Http(_) => {
                "Network connection failed. Please check your internet connection.".to_string()
            }
            Error::Api { status, message } => {
                format!("Service error ({}): {}", status, message)
            }
            Error::Validation(validation) => validation.to_string(),
            Error::State { reason, .. } => reason.clone(),
            Error::Config { reason } => format!("Configuration error: {}", reason),
            _ => "An unexpected error occurred. Please try again.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_retryable() {
        assert!(Error::api(500, "boom").is_retryable());
        assert!(Error::api(429, "slow down").is_retryable());
        assert!(!Error::api(404, "missing").is_retryable());
        assert!(!Error::api(422, "invalid").is_retryable());
    }

    #[test]
    fn test_validation_never_retryable() {
        let err = Error::validation("files", "no files selected");
        assert!(err.is_validation());
        assert!(!err.is_retryable());
        assert!(err.user_message().contains("files"));
    }

    #[test]
    fn test_state_error_message() {
        let err = Error::state("delete", "artifact is still uploading");
        assert_eq!(err.user_message(), "artifact is still uploading");
    }
}
