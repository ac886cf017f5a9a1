//! Error types for the speech engine adapters

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur inside an engine adapter
#[derive(Error, Debug)]
pub enum EngineError {
    /// Audio file not found or inaccessible
    #[error("File not found or inaccessible: {path}")]
    FileNotFound {
        /// Path to the file
        path: PathBuf,
    },

    /// Engine not loaded or sidecar unreachable
    #[error("Speech engine unavailable: {engine}")]
    EngineUnavailable {
        /// Engine name
        engine: String,
    },

    /// Sidecar communication error
    #[error("Failed to communicate with speech engine: {message}")]
    EngineCommunication {
        /// Error message
        message: String,
    },

    /// Model loading error
    #[error("Failed to load speech model: {model}")]
    ModelLoad {
        /// Model path or name
        model: String,
    },

    /// Configuration error
    #[error("Invalid engine configuration: {message}")]
    Configuration {
        /// Error message
        message: String,
    },

    /// Event stream closed while a job was in flight
    #[error("Engine event stream closed")]
    EventStreamClosed,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl EngineError {
    /// Create a file not found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create an engine unavailable error
    pub fn unavailable(engine: impl Into<String>) -> Self {
        Self::EngineUnavailable {
            engine: engine.into(),
        }
    }

    /// Create a communication error
    pub fn communication(message: impl Into<String>) -> Self {
        Self::EngineCommunication {
            message: message.into(),
        }
    }

    /// Create a model load error
    pub fn model_load(model: impl Into<String>) -> Self {
        Self::ModelLoad {
            model: model.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = EngineError::file_not_found("/audio/a.wav");
        assert!(matches!(err, EngineError::FileNotFound { .. }));

        let err = EngineError::unavailable("whisper-http");
        assert!(matches!(err, EngineError::EngineUnavailable { .. }));

        let err = EngineError::model_load("/models/whisper-tiny.tflite");
        assert!(matches!(err, EngineError::ModelLoad { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = EngineError::communication("connection refused");
        assert!(format!("{err}").contains("connection refused"));

        let err = EngineError::file_not_found("/audio/a.wav");
        assert!(format!("{err}").contains("/audio/a.wav"));
    }
}
