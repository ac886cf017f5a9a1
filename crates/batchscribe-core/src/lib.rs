//! Core types and utilities for the batchscribe transcription orchestrator
//!
//! This crate holds the pieces shared by the engine adapter and the batch
//! runner: the job and outcome types, the configuration surface, the error
//! taxonomy, and the transcript sanitizer.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod config;
pub mod error;
pub mod sanitize;
pub mod types;

// Re-export commonly used types
pub use config::{
    AssetsConfig, BatchConfig, DriverConfig, EngineConfig, InputConfig, ReportConfig,
};
pub use error::{Error, Result};
pub use sanitize::sanitize;
pub use types::{AudioJob, TranscriptionOutcome};

/// Initialize the logging system with structured JSON output
///
/// # Errors
///
/// Returns an error if the logging system cannot be initialized.
pub fn init_logging() -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    Ok(())
}
