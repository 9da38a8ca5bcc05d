//! Error types for okta-setup
//!
//! Defines a comprehensive error enum covering all failure modes across the system.
//! Uses thiserror for ergonomic error handling.

use thiserror::Error;

/// Result type alias for okta-setup operations
pub type Result<T> = std::result::Result<T, SetupError>;

/// Comprehensive error type for okta-setup operations
#[derive(Error, Debug)]
pub enum SetupError {
    /// The user declined to overwrite an existing configuration
    #[error("User canceled")]
    UserCanceled,

    /// Configuration errors (unsupported file type, bad SDK config, unknown app type)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid email verification passcode; recovered by re-prompting
    #[error("Invalid passcode")]
    InvalidCode,

    /// Remote API rejection with an HTTP status and server-supplied message
    #[error("Remote API error ({status}): {message}")]
    Rest { status: u16, message: String },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl SetupError {
    /// Whether this error is recoverable by asking the user again.
    ///
    /// Only the invalid-passcode signal is retried; everything else is
    /// terminal for the current run.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SetupError::InvalidCode)
    }
}
