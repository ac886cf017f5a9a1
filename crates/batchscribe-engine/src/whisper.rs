//! HTTP-backed whisper inference sidecar adapter
//!
//! Drives a local whisper inference service over HTTP: `load` waits for the
//! sidecar's health endpoint and posts the model configuration, `submit`
//! fires one transcription request per job and translates the response into
//! the engine event sequence.

use crate::error::{EngineError, EngineResult};
use crate::service::SpeechEngine;
use crate::types::EngineEvent;
use async_trait::async_trait;
use batchscribe_core::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::time::{Duration, sleep};
use tracing::{error, info};

/// Sidecar load request
#[derive(Debug, Serialize)]
struct LoadRequest {
    model_path: String,
    vocab_path: String,
    multilingual: bool,
}

/// Sidecar transcription request
#[derive(Debug, Serialize)]
struct TranscribeRequest {
    audio_path: String,
}

/// Sidecar transcription response
#[derive(Debug, Deserialize)]
struct TranscribeResponse {
    status: String,
    text: Option<String>,
    #[allow(dead_code)]
    error: Option<String>,
}

/// Speech engine backed by a local whisper inference sidecar
#[derive(Debug)]
pub struct WhisperHttpEngine {
    /// Base URL of the sidecar, set during load
    service_url: Option<String>,

    /// HTTP client
    client: reqwest::Client,

    /// Event stream sender
    event_tx: async_channel::Sender<EngineEvent>,

    /// Event stream receiver handed to subscribers
    event_rx: async_channel::Receiver<EngineEvent>,

    /// Whether the model has been loaded
    loaded: bool,
}

impl WhisperHttpEngine {
    /// Health check attempts before giving up on the sidecar
    const MAX_HEALTH_ATTEMPTS: u32 = 30;

    /// Delay between health check attempts
    const HEALTH_RETRY_DELAY: Duration = Duration::from_secs(2);

    /// Create a new sidecar engine
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be constructed.
    #[must_use]
    pub fn new() -> Self {
        let (event_tx, event_rx) = async_channel::unbounded();

        // No total request timeout: a transcription request may legitimately
        // run for minutes; the batch driver enforces its own bound.
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .expect("HTTP client construction");

        Self {
            service_url: None,
            client,
            event_tx,
            event_rx,
            loaded: false,
        }
    }

    /// Wait for the sidecar to answer health checks
    async fn wait_for_service(&self, service_url: &str) -> EngineResult<()> {
        let mut attempts = 0;

        while attempts < Self::MAX_HEALTH_ATTEMPTS {
            match self
                .client
                .get(format!("{service_url}/health"))
                .send()
                .await
            {
                Ok(response) if response.status().is_success() => {
                    info!("Whisper sidecar is ready");
                    return Ok(());
                }
                _ => {}
            }

            attempts += 1;
            sleep(Self::HEALTH_RETRY_DELAY).await;
        }

        Err(EngineError::unavailable("whisper sidecar failed to start"))
    }

    /// Translate one sidecar response into the event sequence for a job
    async fn emit_events(tx: &async_channel::Sender<EngineEvent>, response: TranscribeResponse) {
        if response.status == "not_found" {
            let _ = tx.send(EngineEvent::NotFound).await;
            return;
        }

        if let Some(text) = response.text {
            let _ = tx.send(EngineEvent::ResultAvailable(text)).await;
        }
        let _ = tx.send(EngineEvent::Done).await;
    }
}

impl Default for WhisperHttpEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechEngine for WhisperHttpEngine {
    async fn load(&mut self, config: &EngineConfig) -> EngineResult<()> {
        let port = config.service_port.ok_or_else(|| {
            EngineError::configuration("service_port must be set for the HTTP engine")
        })?;
        let service_url = format!("http://localhost:{port}");

        self.wait_for_service(&service_url).await?;

        let request = LoadRequest {
            model_path: config.model_path.display().to_string(),
            vocab_path: config.vocab_path.display().to_string(),
            multilingual: config.multilingual,
        };

        let response = self
            .client
            .post(format!("{service_url}/load"))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EngineError::model_load(
                config.model_path.display().to_string(),
            ));
        }

        info!(
            model = %config.model_path.display(),
            multilingual = config.multilingual,
            "Whisper model loaded"
        );

        self.service_url = Some(service_url);
        self.loaded = true;
        Ok(())
    }

    fn submit(&self, path: &Path) -> EngineResult<()> {
        let Some(service_url) = self.service_url.clone() else {
            return Err(EngineError::unavailable(self.name()));
        };
        if !self.loaded {
            return Err(EngineError::unavailable(self.name()));
        }

        let client = self.client.clone();
        let tx = self.event_tx.clone();
        let audio_path = path.display().to_string();

        tokio::spawn(async move {
            let _ = tx.send(EngineEvent::Started).await;

            let result = client
                .post(format!("{service_url}/transcribe"))
                .json(&TranscribeRequest {
                    audio_path: audio_path.clone(),
                })
                .send()
                .await;

            match result {
                Ok(response) if response.status() == reqwest::StatusCode::NOT_FOUND => {
                    let _ = tx.send(EngineEvent::NotFound).await;
                }
                Ok(response) if response.status().is_success() => {
                    match response.json::<TranscribeResponse>().await {
                        Ok(body) => Self::emit_events(&tx, body).await,
                        Err(e) => {
                            error!(path = %audio_path, error = %e, "Malformed sidecar response");
                            // Terminate the job anyway so the driver does not
                            // burn the full timeout on a dead request.
                            let _ = tx.send(EngineEvent::Done).await;
                        }
                    }
                }
                Ok(response) => {
                    error!(
                        path = %audio_path,
                        status = %response.status(),
                        "Sidecar rejected transcription request"
                    );
                    let _ = tx.send(EngineEvent::Done).await;
                }
                Err(e) => {
                    error!(path = %audio_path, error = %e, "Sidecar request failed");
                    let _ = tx.send(EngineEvent::Done).await;
                }
            }
        });

        Ok(())
    }

    fn events(&self) -> async_channel::Receiver<EngineEvent> {
        self.event_rx.clone()
    }

    async fn shutdown(&mut self) -> EngineResult<()> {
        self.loaded = false;
        self.service_url = None;
        self.event_tx.close();
        Ok(())
    }

    fn name(&self) -> &str {
        "whisper-http"
    }
}
