//! Core types for the batch transcription orchestrator

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// One audio file plus its inferred language label, the unit of work
/// submitted to the speech engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AudioJob {
    /// Unique job ID, used for log correlation
    pub id: Uuid,

    /// Path to the audio file
    pub path: PathBuf,

    /// Language label derived from the containing directory
    pub language: String,
}

impl AudioJob {
    /// Create a new job for a discovered file
    pub fn new(path: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            path: path.into(),
            language: language.into(),
        }
    }

    /// The file name component of the job's path
    #[must_use]
    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string()
    }
}

/// The recorded result of one job, in report order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionOutcome {
    /// Name of the processed file
    pub filename: String,

    /// Language label from discovery
    pub language: String,

    /// Sanitized transcript text (empty on failure)
    pub transcription: String,

    /// Wall-clock processing latency in milliseconds
    pub time_ms: u64,

    /// Whether the job degraded (timeout or engine-reported missing file)
    pub failed: bool,
}

impl TranscriptionOutcome {
    /// Record a successful transcription
    pub fn success(
        filename: impl Into<String>,
        language: impl Into<String>,
        transcription: impl Into<String>,
        time_ms: u64,
    ) -> Self {
        Self {
            filename: filename.into(),
            language: language.into(),
            transcription: transcription.into(),
            time_ms,
            failed: false,
        }
    }

    /// Record a degraded outcome with an empty transcript
    pub fn degraded(filename: impl Into<String>, language: impl Into<String>, time_ms: u64) -> Self {
        Self {
            filename: filename.into(),
            language: language.into(),
            transcription: String::new(),
            time_ms,
            failed: true,
        }
    }
}
