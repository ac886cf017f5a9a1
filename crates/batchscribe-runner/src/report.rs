//! Result aggregation and JSON report serialization

use crate::error::{Result, RunnerError};
use batchscribe_core::types::TranscriptionOutcome;
use std::path::{Path, PathBuf};
use tracing::info;

/// Append-only sequence of job outcomes, in completion order.
///
/// Completion order equals submission order because the driver keeps exactly
/// one job in flight.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    /// Recorded outcomes
    outcomes: Vec<TranscriptionOutcome>,
}

impl ResultAggregator {
    /// Create an empty aggregator
    #[must_use]
    pub const fn new() -> Self {
        Self {
            outcomes: Vec::new(),
        }
    }

    /// Record one job's outcome
    pub fn push(&mut self, outcome: TranscriptionOutcome) {
        self.outcomes.push(outcome);
    }

    /// Number of recorded outcomes
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether no outcomes have been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// The recorded outcomes, in order
    #[must_use]
    pub fn outcomes(&self) -> &[TranscriptionOutcome] {
        &self.outcomes
    }

    /// Number of outcomes marked failed
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.failed).count()
    }
}

/// Writes the final report as a pretty-printed JSON array
#[derive(Debug)]
pub struct ReportWriter {
    /// Destination path
    output_path: PathBuf,
}

impl ReportWriter {
    /// Create a writer for the given destination
    #[must_use]
    pub const fn new(output_path: PathBuf) -> Self {
        Self { output_path }
    }

    /// The destination path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.output_path
    }

    /// Serialize the outcomes and write the whole report in one pass.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Report`] if serialization or the write fails;
    /// this is the only fatal failure at the end of a batch.
    pub async fn write(&self, outcomes: &[TranscriptionOutcome]) -> Result<()> {
        let json = serde_json::to_string_pretty(outcomes)
            .map_err(|e| RunnerError::report(format!("Failed to serialize report: {e}")))?;

        if let Some(parent) = self.output_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                RunnerError::report(format!(
                    "Failed to create report directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        tokio::fs::write(&self.output_path, json).await.map_err(|e| {
            RunnerError::report(format!(
                "Failed to write report to {}: {e}",
                self.output_path.display()
            ))
        })?;

        info!(
            path = %self.output_path.display(),
            entries = outcomes.len(),
            "Report written"
        );

        Ok(())
    }
}
