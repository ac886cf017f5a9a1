//! Error types shared across the batchscribe crates

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core crate
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Invalid configuration: {message}")]
    Configuration {
        /// Error message
        message: String,
    },

    /// Input root directory does not exist
    #[error("Input directory not found: {path}")]
    InputDirectoryNotFound {
        /// The missing directory
        path: PathBuf,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an input-directory-not-found error
    pub fn input_directory_not_found(path: impl Into<PathBuf>) -> Self {
        Self::InputDirectoryNotFound { path: path.into() }
    }
}
