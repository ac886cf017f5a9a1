//! Batch driver state machine
//!
//! Drives the whole batch: scan, then one job in flight at a time against
//! the speech engine, bridging each asynchronous terminal event back into
//! the driver with a bounded timeout, and finally one report write. Job N+1
//! is never submitted until job N's bridge has resolved; this is the
//! central ordering invariant that makes a single bridge slot sufficient.

use crate::bridge::{BridgeWait, CompletionBridge};
use crate::error::Result;
use crate::queue::JobQueue;
use crate::report::{ReportWriter, ResultAggregator};
use crate::scanner::DirectoryScanner;
use batchscribe_core::sanitize;
use batchscribe_core::types::{AudioJob, TranscriptionOutcome};
use batchscribe_core::BatchConfig;
use batchscribe_engine::{EngineEvent, SpeechEngine};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Shared cell holding the in-flight job's bridge
type CurrentBridge = Arc<Mutex<Option<Arc<CompletionBridge>>>>;

/// Batch driver lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Waiting for preconditions
    Idle,

    /// Discovering input files
    Scanning,

    /// Processing jobs one at a time
    Draining,

    /// Writing the report
    Finalizing,

    /// Batch complete
    Terminated,
}

impl std::fmt::Display for DriverState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Scanning => write!(f, "scanning"),
            Self::Draining => write!(f, "draining"),
            Self::Finalizing => write!(f, "finalizing"),
            Self::Terminated => write!(f, "terminated"),
        }
    }
}

/// Terminal status of a batch, returned to the caller
#[derive(Debug, Clone)]
pub struct BatchSummary {
    /// Number of jobs processed
    pub total_jobs: usize,

    /// Jobs with a usable transcript
    pub succeeded: usize,

    /// Jobs degraded by timeout or a missing file
    pub failed: usize,

    /// Where the report was written
    pub report_path: PathBuf,

    /// Batch start time
    pub started_at: DateTime<Utc>,

    /// Batch end time
    pub finished_at: DateTime<Utc>,
}

/// Top-level batch orchestrator
pub struct BatchDriver {
    /// Run configuration
    config: BatchConfig,

    /// Speech engine adapter
    engine: Arc<dyn SpeechEngine>,

    /// Bridge for the currently in-flight job; `None` between jobs, so late
    /// engine events have nowhere to land and are dropped
    current: CurrentBridge,

    /// Current lifecycle state
    state: DriverState,
}

impl std::fmt::Debug for BatchDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchDriver")
            .field("engine", &self.engine.name())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl BatchDriver {
    /// Create a driver for a loaded engine
    #[must_use]
    pub fn new(config: BatchConfig, engine: Arc<dyn SpeechEngine>) -> Self {
        Self {
            config,
            engine,
            current: Arc::new(Mutex::new(None)),
            state: DriverState::Idle,
        }
    }

    /// Current lifecycle state
    #[must_use]
    pub const fn state(&self) -> DriverState {
        self.state
    }

    /// Run the batch to completion.
    ///
    /// Per-job failures (timeout, engine-reported missing file) degrade that
    /// job's outcome and never interrupt the loop; partial success is the
    /// expected steady state. Only a missing input root or a report-write
    /// failure surfaces as an error.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RunnerError::InputDirectoryNotFound`] if the input
    /// root is absent (the batch never drains), or
    /// [`crate::RunnerError::Report`] if the final report cannot be written.
    pub async fn run(&mut self) -> Result<BatchSummary> {
        let started_at = Utc::now();

        self.transition(DriverState::Scanning);
        let scanner = DirectoryScanner::new(self.config.input.clone());
        let jobs = scanner.scan().await?;
        let total_jobs = jobs.len();
        let mut queue = JobQueue::from_jobs(jobs);

        let listener = Self::spawn_event_listener(self.engine.events(), self.current.clone());

        let mut aggregator = ResultAggregator::new();

        if queue.is_empty() {
            warn!("No audio files found to process");
        } else {
            self.transition(DriverState::Draining);
            while let Some(job) = queue.pop() {
                let outcome = self.process_job(&job).await;
                aggregator.push(outcome);

                // Load-shedding courtesy between engine submissions, not a
                // correctness requirement
                if !queue.is_empty() {
                    tokio::time::sleep(self.config.driver.cooldown()).await;
                }
            }
        }

        self.transition(DriverState::Finalizing);
        listener.abort();

        let failed = aggregator.failed_count();
        let writer = ReportWriter::new(self.config.report.output_path.clone());
        writer.write(aggregator.outcomes()).await?;

        self.transition(DriverState::Terminated);

        Ok(BatchSummary {
            total_jobs,
            succeeded: total_jobs - failed,
            failed,
            report_path: self.config.report.output_path.clone(),
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Process a single job: submit, wait on its bridge, record the outcome
    async fn process_job(&self, job: &AudioJob) -> TranscriptionOutcome {
        info!(
            job_id = %job.id,
            path = %job.path.display(),
            language = %job.language,
            "Processing file"
        );

        let start = Instant::now();
        let bridge = Arc::new(CompletionBridge::new());
        *self.current.lock() = Some(bridge.clone());

        if let Err(e) = self.engine.submit(&job.path) {
            error!(job_id = %job.id, error = %e, "Failed to submit job to engine");
            *self.current.lock() = None;
            return TranscriptionOutcome::degraded(job.filename(), &job.language, elapsed_ms(start));
        }

        let wait = bridge
            .await_with_timeout(self.config.driver.job_timeout())
            .await;

        // Clear the slot either way; a late terminal event for this job now
        // has no destination and is dropped by the listener.
        *self.current.lock() = None;

        let time_ms = elapsed_ms(start);

        match wait {
            BridgeWait::Completed => bridge.take_result().map_or_else(
                || {
                    warn!(
                        job_id = %job.id,
                        path = %job.path.display(),
                        "Job terminated without a transcript"
                    );
                    TranscriptionOutcome::degraded(job.filename(), &job.language, time_ms)
                },
                |raw| {
                    let text = sanitize(&raw);
                    info!(
                        job_id = %job.id,
                        path = %job.path.display(),
                        time_ms,
                        "Transcription completed"
                    );
                    TranscriptionOutcome::success(job.filename(), &job.language, text, time_ms)
                },
            ),
            BridgeWait::TimedOut => {
                error!(
                    job_id = %job.id,
                    path = %job.path.display(),
                    timeout_seconds = self.config.driver.job_timeout_seconds,
                    "Transcription timed out"
                );
                TranscriptionOutcome::degraded(job.filename(), &job.language, time_ms)
            }
        }
    }

    /// Subscribe to the engine's event stream, once, and route events into
    /// the current job's bridge. Events arriving with no bridge installed
    /// belong to a job the driver has already given up on and are dropped.
    fn spawn_event_listener(
        events: async_channel::Receiver<EngineEvent>,
        current: CurrentBridge,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Ok(event) = events.recv().await {
                match event {
                    EngineEvent::Started => {
                        debug!("Engine started processing");
                    }
                    EngineEvent::ResultAvailable(text) => {
                        let bridge = current.lock().clone();
                        if let Some(bridge) = bridge {
                            bridge.set_result(text);
                        } else {
                            debug!("Dropping stale transcription result");
                        }
                    }
                    EngineEvent::Done | EngineEvent::NotFound => {
                        let bridge = current.lock().take();
                        if let Some(bridge) = bridge {
                            if event == EngineEvent::NotFound {
                                warn!("Engine reported submitted file not found");
                            }
                            bridge.signal();
                        } else {
                            debug!(%event, "Dropping stale terminal event");
                        }
                    }
                }
            }
            debug!("Engine event stream closed");
        })
    }

    /// Record and log a state transition
    fn transition(&mut self, next: DriverState) {
        debug!(from = %self.state, to = %next, "Driver state transition");
        self.state = next;
    }
}

/// Elapsed wall-clock milliseconds since `start`
#[allow(clippy::cast_possible_truncation)]
fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
