//! Error types for the batch orchestrator

use batchscribe_engine::EngineError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for runner operations
pub type Result<T> = std::result::Result<T, RunnerError>;

/// Errors that can occur while running a batch
#[derive(Error, Debug)]
pub enum RunnerError {
    /// The input root directory does not exist; the batch never starts
    #[error("Input directory not found: {path}")]
    InputDirectoryNotFound {
        /// The missing root directory
        path: PathBuf,
    },

    /// Configuration error
    #[error("Invalid configuration: {message}")]
    Configuration {
        /// Error message
        message: String,
    },

    /// Engine adapter error
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// The final report could not be serialized or written
    #[error("Report serialization failed: {message}")]
    Report {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl RunnerError {
    /// Create an input-directory-not-found error
    #[must_use]
    pub fn input_directory_not_found(path: impl Into<PathBuf>) -> Self {
        Self::InputDirectoryNotFound { path: path.into() }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a report failure error
    #[must_use]
    pub fn report(message: impl Into<String>) -> Self {
        Self::Report {
            message: message.into(),
        }
    }
}
