//! Speech engine adapter boundary for the batchscribe orchestrator
//!
//! This crate defines the asynchronous, event-driven contract the batch
//! runner consumes: submit one file at a time, then observe lifecycle events
//! on a stream until the job's single terminal event fires. Two adapters are
//! provided: an HTTP-backed whisper inference sidecar and a scriptable mock
//! for tests.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    missing_docs
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::multiple_crate_versions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod error;
pub mod mock;
pub mod service;
pub mod types;
pub mod whisper;

pub use batchscribe_core::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use mock::{MockBehavior, MockSpeechEngine};
pub use service::SpeechEngine;
pub use types::EngineEvent;
pub use whisper::WhisperHttpEngine;
