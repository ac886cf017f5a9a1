//! Scriptable mock speech engine for testing

use crate::error::{EngineError, EngineResult};
use crate::service::SpeechEngine;
use crate::types::EngineEvent;
use async_trait::async_trait;
use batchscribe_core::EngineConfig;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::time::{Duration, sleep};

/// Scripted behavior for one submitted file, keyed by file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockBehavior {
    /// Emit `Started`, `ResultAvailable(text)`, then `Done`
    Transcript(String),

    /// Emit `Started` then `NotFound`
    NotFound,

    /// Emit `Started` and never a terminal event (exercises the timeout path)
    Silent,
}

/// Mock speech engine with per-file scripted behavior
#[derive(Debug)]
pub struct MockSpeechEngine {
    /// Whether the engine has been loaded
    loaded: bool,

    /// Simulated processing delay before the terminal event
    processing_delay_ms: u64,

    /// Per-filename scripted behaviors
    behaviors: HashMap<String, MockBehavior>,

    /// Event stream sender
    event_tx: async_channel::Sender<EngineEvent>,

    /// Event stream receiver handed to subscribers
    event_rx: async_channel::Receiver<EngineEvent>,

    /// Number of submissions observed
    submissions: AtomicUsize,
}

impl MockSpeechEngine {
    /// Create a new mock engine
    pub fn new() -> Self {
        let (event_tx, event_rx) = async_channel::unbounded();
        Self {
            loaded: false,
            processing_delay_ms: 10,
            behaviors: HashMap::new(),
            event_tx,
            event_rx,
            submissions: AtomicUsize::new(0),
        }
    }

    /// Set the simulated processing delay
    #[must_use]
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.processing_delay_ms = delay_ms;
        self
    }

    /// Script a canned transcript for a file name
    #[must_use]
    pub fn with_transcript(mut self, filename: impl Into<String>, text: impl Into<String>) -> Self {
        self.behaviors
            .insert(filename.into(), MockBehavior::Transcript(text.into()));
        self
    }

    /// Script a `NotFound` terminal event for a file name
    #[must_use]
    pub fn with_missing(mut self, filename: impl Into<String>) -> Self {
        self.behaviors
            .insert(filename.into(), MockBehavior::NotFound);
        self
    }

    /// Script a file name to never signal completion
    #[must_use]
    pub fn with_silent(mut self, filename: impl Into<String>) -> Self {
        self.behaviors.insert(filename.into(), MockBehavior::Silent);
        self
    }

    /// Number of submissions observed so far
    pub fn submissions(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }

    fn behavior_for(&self, path: &Path) -> MockBehavior {
        let filename = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown");

        self.behaviors.get(filename).cloned().unwrap_or_else(|| {
            MockBehavior::Transcript(format!("mock transcript for {filename}"))
        })
    }
}

impl Default for MockSpeechEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechEngine for MockSpeechEngine {
    async fn load(&mut self, _config: &EngineConfig) -> EngineResult<()> {
        self.loaded = true;
        Ok(())
    }

    fn submit(&self, path: &Path) -> EngineResult<()> {
        if !self.loaded {
            return Err(EngineError::unavailable(self.name()));
        }

        self.submissions.fetch_add(1, Ordering::SeqCst);

        let behavior = self.behavior_for(path);
        let tx = self.event_tx.clone();
        let delay = Duration::from_millis(self.processing_delay_ms);

        tokio::spawn(async move {
            let _ = tx.send(EngineEvent::Started).await;
            sleep(delay).await;

            match behavior {
                MockBehavior::Transcript(text) => {
                    let _ = tx.send(EngineEvent::ResultAvailable(text)).await;
                    let _ = tx.send(EngineEvent::Done).await;
                }
                MockBehavior::NotFound => {
                    let _ = tx.send(EngineEvent::NotFound).await;
                }
                MockBehavior::Silent => {}
            }
        });

        Ok(())
    }

    fn events(&self) -> async_channel::Receiver<EngineEvent> {
        self.event_rx.clone()
    }

    async fn shutdown(&mut self) -> EngineResult<()> {
        self.loaded = false;
        self.event_tx.close();
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn test_config() -> EngineConfig {
        EngineConfig {
            model_path: "/models/whisper-tiny.tflite".into(),
            vocab_path: "/models/filters_vocab_multilingual.bin".into(),
            multilingual: true,
            service_port: None,
            startup_settle_ms: 0,
        }
    }

    #[tokio::test]
    async fn test_submit_before_load_fails() {
        let engine = MockSpeechEngine::new();
        let result = engine.submit(&PathBuf::from("/audio/a.wav"));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_default_transcript_sequence() {
        let mut engine = MockSpeechEngine::new().with_delay(1);
        engine.load(&test_config()).await.unwrap();

        let events = engine.events();
        engine.submit(&PathBuf::from("/audio/a.wav")).unwrap();

        assert_eq!(events.recv().await.unwrap(), EngineEvent::Started);
        assert_eq!(
            events.recv().await.unwrap(),
            EngineEvent::ResultAvailable("mock transcript for a.wav".to_string())
        );
        assert_eq!(events.recv().await.unwrap(), EngineEvent::Done);
    }

    #[tokio::test]
    async fn test_scripted_transcript() {
        let mut engine = MockSpeechEngine::new()
            .with_delay(1)
            .with_transcript("a.wav", "[_SOT_]hello[_EOT_]");
        engine.load(&test_config()).await.unwrap();

        let events = engine.events();
        engine.submit(&PathBuf::from("/audio/arabic/a.wav")).unwrap();

        assert_eq!(events.recv().await.unwrap(), EngineEvent::Started);
        assert_eq!(
            events.recv().await.unwrap(),
            EngineEvent::ResultAvailable("[_SOT_]hello[_EOT_]".to_string())
        );
        assert_eq!(events.recv().await.unwrap(), EngineEvent::Done);
    }

    #[tokio::test]
    async fn test_not_found_sequence() {
        let mut engine = MockSpeechEngine::new().with_delay(1).with_missing("gone.wav");
        engine.load(&test_config()).await.unwrap();

        let events = engine.events();
        engine.submit(&PathBuf::from("/audio/gone.wav")).unwrap();

        assert_eq!(events.recv().await.unwrap(), EngineEvent::Started);
        assert_eq!(events.recv().await.unwrap(), EngineEvent::NotFound);
    }

    #[tokio::test]
    async fn test_silent_never_terminates() {
        let mut engine = MockSpeechEngine::new().with_delay(1).with_silent("stuck.wav");
        engine.load(&test_config()).await.unwrap();

        let events = engine.events();
        engine.submit(&PathBuf::from("/audio/stuck.wav")).unwrap();

        assert_eq!(events.recv().await.unwrap(), EngineEvent::Started);

        let terminal =
            tokio::time::timeout(Duration::from_millis(50), events.recv()).await;
        assert!(terminal.is_err());
    }

    #[tokio::test]
    async fn test_submission_count() {
        let mut engine = MockSpeechEngine::new().with_delay(1);
        engine.load(&test_config()).await.unwrap();

        assert_eq!(engine.submissions(), 0);
        engine.submit(&PathBuf::from("/audio/a.wav")).unwrap();
        engine.submit(&PathBuf::from("/audio/b.wav")).unwrap();
        assert_eq!(engine.submissions(), 2);
    }

    #[tokio::test]
    async fn test_shutdown_closes_stream() {
        let mut engine = MockSpeechEngine::new();
        engine.load(&test_config()).await.unwrap();

        let events = engine.events();
        engine.shutdown().await.unwrap();

        assert!(events.recv().await.is_err());
    }
}
