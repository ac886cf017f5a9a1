//! Batch transcription orchestrator
//!
//! This crate drives a directory tree of audio files through an asynchronous
//! speech engine, one job at a time: discover files, submit each to the
//! engine, bridge the asynchronous completion signal back into the waiting
//! driver with a bounded timeout, sanitize the raw transcript, and serialize
//! one ordered JSON report at the end of the batch.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod assets;
pub mod bridge;
pub mod driver;
pub mod error;
pub mod preflight;
pub mod queue;
pub mod report;
pub mod scanner;

// Re-export commonly used types
pub use batchscribe_core::{AudioJob, BatchConfig, TranscriptionOutcome};
pub use bridge::{BridgeWait, CompletionBridge};
pub use driver::{BatchDriver, BatchSummary, DriverState};
pub use error::{Result, RunnerError};
pub use queue::JobQueue;
pub use report::{ReportWriter, ResultAggregator};
pub use scanner::DirectoryScanner;
