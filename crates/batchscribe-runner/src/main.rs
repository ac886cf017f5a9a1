//! Batchscribe batch transcription runner
//!
//! Discovers audio files under language-labeled directories, transcribes
//! them one at a time through a speech engine, and writes a single ordered
//! JSON report.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

use batchscribe_core::BatchConfig;
use batchscribe_engine::{SpeechEngine, WhisperHttpEngine};
use batchscribe_runner::{
    BatchDriver, DirectoryScanner, Result, RunnerError, preflight,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Exit code for setup-time failures: the batch never started
const EXIT_SETUP_FAILURE: u8 = 1;

/// Exit code for a failed report write at the end of a batch
const EXIT_REPORT_FAILURE: u8 = 2;

/// Command line interface for the batchscribe runner
#[derive(Parser)]
#[command(
    name = "batchscribe",
    version = env!("CARGO_PKG_VERSION"),
    about = "Batch audio transcription orchestrator",
    long_about = "Walks a directory tree of language-labeled audio files, transcribes each file through a speech engine one at a time, and writes an ordered JSON report of filename, language, transcript, and latency."
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Enable structured JSON logging
    #[arg(long)]
    json: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
enum Commands {
    /// Run the batch and write the report (default)
    Run,

    /// List discovered audio files without transcribing
    Scan {
        /// Root directory to scan (overrides config)
        #[arg(value_name = "DIRECTORY")]
        directory: Option<PathBuf>,
    },

    /// Validate or show the resolved configuration
    Config {
        /// Show resolved configuration
        #[arg(short, long)]
        show: bool,

        /// Validate configured directories
        #[arg(short, long)]
        validate: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if it exists (for development convenience)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(&cli);

    let config = match load_config(cli.config.as_deref()).await {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {e}");
            return ExitCode::from(EXIT_SETUP_FAILURE);
        }
    };

    match cli.command {
        Some(Commands::Scan { directory }) => run_scan(directory, config).await,
        Some(Commands::Config { show, validate }) => handle_config_command(&config, show, validate),
        Some(Commands::Run) | None => run_batch(config).await,
    }
}

/// Initialize logging system
fn init_logging(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if cli.json {
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        log_level = cli.log_level,
        "Batchscribe starting"
    );
}

/// Load configuration from file or layered environment sources
async fn load_config(config_path: Option<&std::path::Path>) -> Result<BatchConfig> {
    if let Some(path) = config_path {
        info!("Loading configuration from: {}", path.display());

        let config_content = tokio::fs::read_to_string(path).await.map_err(|e| {
            RunnerError::configuration(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        let config: BatchConfig = toml::from_str(&config_content).map_err(|e| {
            RunnerError::configuration(format!("Failed to parse config file: {e}"))
        })?;

        Ok(config)
    } else {
        info!("Loading default configuration");
        BatchConfig::load().map_err(|e| RunnerError::configuration(e.to_string()))
    }
}

/// Run the full batch: preflight, drain, report
async fn run_batch(config: BatchConfig) -> ExitCode {
    let mut engine = WhisperHttpEngine::new();

    if let Err(e) = preflight::ensure_ready(&config, &mut engine).await {
        error!("Preflight failed, batch will not start: {e}");
        return ExitCode::from(EXIT_SETUP_FAILURE);
    }

    let engine: Arc<dyn SpeechEngine> = Arc::new(engine);
    let mut driver = BatchDriver::new(config, engine);

    match driver.run().await {
        Ok(summary) => {
            info!(
                total = summary.total_jobs,
                succeeded = summary.succeeded,
                failed = summary.failed,
                report = %summary.report_path.display(),
                "Batch complete"
            );
            ExitCode::SUCCESS
        }
        Err(e @ RunnerError::Report { .. }) => {
            error!("Failed to write report: {e}");
            ExitCode::from(EXIT_REPORT_FAILURE)
        }
        Err(e) => {
            error!("Batch failed: {e}");
            ExitCode::from(EXIT_SETUP_FAILURE)
        }
    }
}

/// List discovered jobs without transcribing
async fn run_scan(directory: Option<PathBuf>, mut config: BatchConfig) -> ExitCode {
    if let Some(directory) = directory {
        config.input.root_directory = directory;
    }

    let scanner = DirectoryScanner::new(config.input);
    match scanner.scan().await {
        Ok(jobs) => {
            println!("Found {} audio files:", jobs.len());
            for (i, job) in jobs.iter().enumerate() {
                println!(
                    "  {}: {} (language: {})",
                    i + 1,
                    job.path.display(),
                    job.language
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Scan failed: {e}");
            ExitCode::from(EXIT_SETUP_FAILURE)
        }
    }
}

/// Handle configuration commands
fn handle_config_command(config: &BatchConfig, show: bool, validate: bool) -> ExitCode {
    if validate {
        info!("Validating configuration...");

        if !config.input.root_directory.exists() {
            warn!(
                "Input directory does not exist: {}",
                config.input.root_directory.display()
            );
        }
        for language in &config.input.language_dirs {
            let dir = config.input.root_directory.join(language);
            if !dir.exists() {
                warn!("Language directory does not exist: {}", dir.display());
            }
        }

        info!("Configuration validation completed");
    }

    if show {
        match toml::to_string_pretty(config) {
            Ok(rendered) => println!("{rendered}"),
            Err(e) => {
                error!("Failed to serialize configuration: {e}");
                return ExitCode::from(EXIT_SETUP_FAILURE);
            }
        }
    }

    ExitCode::SUCCESS
}
