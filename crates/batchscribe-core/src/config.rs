//! Configuration management for the batch transcription orchestrator

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration for a batch transcription run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Input discovery configuration
    pub input: InputConfig,

    /// Speech engine configuration
    pub engine: EngineConfig,

    /// Batch driver configuration
    pub driver: DriverConfig,

    /// Report output configuration
    pub report: ReportConfig,

    /// Asset provisioning configuration
    #[serde(default)]
    pub assets: AssetsConfig,
}

/// Input discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Root directory containing one subdirectory per language
    pub root_directory: PathBuf,

    /// Language-labeled subdirectory names to scan
    #[serde(default = "default_language_dirs")]
    pub language_dirs: Vec<String>,

    /// Audio file extensions to accept (matched case-insensitively)
    #[serde(default = "default_file_extensions")]
    pub file_extensions: Vec<String>,

    /// Sort discovered files by path for deterministic report ordering
    #[serde(default = "default_sort_entries")]
    pub sort_entries: bool,

    /// Maximum directory recursion depth
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

/// Speech engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Path to the acoustic model file
    pub model_path: PathBuf,

    /// Path to the vocabulary/filters file
    pub vocab_path: PathBuf,

    /// Load the multilingual model variant
    #[serde(default = "default_multilingual")]
    pub multilingual: bool,

    /// Port of the local inference sidecar (HTTP engine only)
    pub service_port: Option<u16>,

    /// Settle delay after the engine reports loaded, in milliseconds
    #[serde(default = "default_startup_settle_ms")]
    pub startup_settle_ms: u64,
}

/// Batch driver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Upper bound on a single job's processing time, in seconds
    #[serde(default = "default_job_timeout")]
    pub job_timeout_seconds: u64,

    /// Cooldown between consecutive engine submissions, in milliseconds
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
}

/// Report output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Path the JSON report is written to
    pub output_path: PathBuf,
}

/// Asset provisioning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Directory model/vocab assets are copied from (skipped when unset)
    pub source_directory: Option<PathBuf>,

    /// Destination directory for provisioned assets
    pub working_directory: Option<PathBuf>,

    /// Asset file extensions to copy
    #[serde(default = "default_asset_extensions")]
    pub extensions: Vec<String>,
}

// Default value functions
fn default_language_dirs() -> Vec<String> {
    vec!["arabic".to_string(), "farsi".to_string()]
}

fn default_file_extensions() -> Vec<String> {
    ["wav", "mp3", "m4a", "flac", "ogg"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

const fn default_sort_entries() -> bool {
    true
}

const fn default_max_depth() -> usize {
    10
}

const fn default_multilingual() -> bool {
    true
}

const fn default_startup_settle_ms() -> u64 {
    1000
}

const fn default_job_timeout() -> u64 {
    300 // 5 minutes
}

const fn default_cooldown_ms() -> u64 {
    500
}

fn default_asset_extensions() -> Vec<String> {
    ["pcm", "bin", "wav", "tflite"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            source_directory: None,
            working_directory: None,
            extensions: default_asset_extensions(),
        }
    }
}

impl EngineConfig {
    /// Get the startup settle delay as Duration
    #[must_use]
    pub const fn startup_settle(&self) -> Duration {
        Duration::from_millis(self.startup_settle_ms)
    }
}

impl DriverConfig {
    /// Get the per-job timeout as Duration
    #[must_use]
    pub const fn job_timeout(&self) -> Duration {
        Duration::from_secs(self.job_timeout_seconds)
    }

    /// Get the inter-job cooldown as Duration
    #[must_use]
    pub const fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

impl BatchConfig {
    /// Load configuration from layered sources (files, then environment)
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Configuration`] if:
    /// - Configuration files contain invalid TOML/JSON syntax
    /// - Required configuration values are missing
    /// - Environment variables have invalid values
    pub fn load() -> crate::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("batchscribe").required(false))
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("BATCHSCRIBE").separator("_"))
            .build()
            .map_err(|e| crate::Error::configuration(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| crate::Error::configuration(e.to_string()))
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        let home_dir = directories::UserDirs::new()
            .map_or_else(|| PathBuf::from("."), |dirs| dirs.home_dir().to_path_buf());

        let data_dir = home_dir.join(".batchscribe");

        Self {
            input: InputConfig {
                root_directory: data_dir.join("audio"),
                language_dirs: default_language_dirs(),
                file_extensions: default_file_extensions(),
                sort_entries: default_sort_entries(),
                max_depth: default_max_depth(),
            },
            engine: EngineConfig {
                model_path: data_dir.join("whisper-tiny.tflite"),
                vocab_path: data_dir.join("filters_vocab_multilingual.bin"),
                multilingual: default_multilingual(),
                service_port: None,
                startup_settle_ms: default_startup_settle_ms(),
            },
            driver: DriverConfig {
                job_timeout_seconds: default_job_timeout(),
                cooldown_ms: default_cooldown_ms(),
            },
            report: ReportConfig {
                output_path: data_dir.join("transcriptions.json"),
            },
            assets: AssetsConfig {
                source_directory: None,
                working_directory: Some(data_dir),
                extensions: default_asset_extensions(),
            },
        }
    }
}
