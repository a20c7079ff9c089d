// src/error.rs

//! Unified error handling for the snapshot application.

use std::fmt;

use thiserror::Error;

/// Result type alias for snapshot operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Response body was not a usable search bundle
    #[error("Invalid bundle from {url}: {message}")]
    Bundle { url: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a bundle error for the given request URL.
    pub fn bundle(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Bundle {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a status error for the given request URL.
    pub fn status(url: impl Into<String>, status: reqwest::StatusCode) -> Self {
        Self::Status {
            url: url.into(),
            status: status.as_u16(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message() {
        let err = AppError::status("http://x/fhir/ValueSet", reqwest::StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "HTTP status 404 from http://x/fhir/ValueSet");
    }

    #[test]
    fn test_bundle_message() {
        let err = AppError::bundle("http://x", "missing entry");
        assert!(err.to_string().contains("missing entry"));
    }
}
