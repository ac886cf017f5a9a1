//! Core speech engine trait consumed by the batch runner

use crate::error::EngineResult;
use crate::types::EngineEvent;
use async_trait::async_trait;
use batchscribe_core::EngineConfig;
use std::path::Path;

/// Contract every speech engine adapter must satisfy.
///
/// The runner drives exactly one job at a time: it calls [`submit`], then
/// waits for that job's terminal event on the stream returned by [`events`]
/// before submitting the next file. Calling [`submit`] while a previous
/// job's terminal event is still outstanding is a contract violation.
///
/// [`submit`]: SpeechEngine::submit
/// [`events`]: SpeechEngine::events
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Load the model and vocabulary; must complete before the first submit.
    async fn load(&mut self, config: &EngineConfig) -> EngineResult<()>;

    /// Start transcribing one file. Non-blocking; the outcome arrives as
    /// events on the stream. Must be called from within a tokio runtime.
    fn submit(&self, path: &Path) -> EngineResult<()>;

    /// The event stream for submitted jobs. Subscribed to once, by the
    /// runner's listener task.
    fn events(&self) -> async_channel::Receiver<EngineEvent>;

    /// Shut the engine down gracefully.
    async fn shutdown(&mut self) -> EngineResult<()>;

    /// Adapter name, for logging.
    fn name(&self) -> &str;
}
