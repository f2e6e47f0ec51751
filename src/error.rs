//! Error types for the Kaisang library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`KaisangError`] enum.
//!
//! # Examples
//!
//! ```
//! use kaisang::error::{KaisangError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(KaisangError::config("missing intents file"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Kaisang operations.
#[derive(Error, Debug)]
pub enum KaisangError {
    /// I/O errors (file operations, network, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Intent configuration errors (missing tags, empty pattern lists, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A vectorizer or classifier was used before `fit` or artifact load.
    #[error("Unfitted model: {0}")]
    UnfittedModel(String),

    /// Training failed (inconsistent inputs, degenerate data, etc.)
    #[error("Training error: {0}")]
    Training(String),

    /// Artifact serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Database errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Authentication errors
    #[error("Auth error: {0}")]
    Auth(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with KaisangError.
pub type Result<T> = std::result::Result<T, KaisangError>;

impl KaisangError {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        KaisangError::Analysis(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        KaisangError::Config(msg.into())
    }

    /// Create a new unfitted-model error.
    pub fn unfitted<S: Into<String>>(msg: S) -> Self {
        KaisangError::UnfittedModel(msg.into())
    }

    /// Create a new training error.
    pub fn training<S: Into<String>>(msg: S) -> Self {
        KaisangError::Training(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        KaisangError::Serialization(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        KaisangError::Storage(msg.into())
    }

    /// Create a new auth error.
    pub fn auth<S: Into<String>>(msg: S) -> Self {
        KaisangError::Auth(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        KaisangError::Other(msg.into())
    }

    /// Create a new not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        KaisangError::Other(format!("Not found: {}", msg.into()))
    }
}

impl From<rusqlite::Error> for KaisangError {
    fn from(e: rusqlite::Error) -> Self {
        KaisangError::Storage(e.to_string())
    }
}

impl From<bincode::Error> for KaisangError {
    fn from(e: bincode::Error) -> Self {
        KaisangError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = KaisangError::analysis("Test analysis error");
        assert_eq!(error.to_string(), "Analysis error: Test analysis error");

        let error = KaisangError::config("Test config error");
        assert_eq!(error.to_string(), "Configuration error: Test config error");

        let error = KaisangError::unfitted("vectorizer");
        assert_eq!(error.to_string(), "Unfitted model: vectorizer");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let kaisang_error = KaisangError::from(io_error);

        match kaisang_error {
            KaisangError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
