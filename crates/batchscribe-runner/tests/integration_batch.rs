//! End-to-end batch tests driving the full pipeline with a scripted engine

use batchscribe_core::BatchConfig;
use batchscribe_engine::{MockSpeechEngine, SpeechEngine};
use batchscribe_runner::{BatchDriver, DriverState};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

async fn write_audio_file(root: &Path, language: &str, name: &str) {
    let dir = root.join(language);
    tokio::fs::create_dir_all(&dir).await.unwrap();
    tokio::fs::write(dir.join(name), b"RIFF....WAVE").await.unwrap();
}

fn batch_config(temp: &TempDir, languages: &[&str]) -> BatchConfig {
    let mut config = BatchConfig::default();
    config.input.root_directory = temp.path().to_path_buf();
    config.input.language_dirs = languages.iter().map(ToString::to_string).collect();
    config.driver.job_timeout_seconds = 2;
    config.driver.cooldown_ms = 1;
    config.report.output_path = temp.path().join("transcriptions.json");
    config
}

async fn load(engine: MockSpeechEngine) -> Arc<dyn SpeechEngine> {
    let mut engine = engine;
    engine.load(&BatchConfig::default().engine).await.unwrap();
    Arc::new(engine)
}

#[tokio::test(start_paused = true)]
async fn batch_produces_ordered_report_with_sanitized_text() {
    let temp = TempDir::new().unwrap();
    write_audio_file(temp.path(), "langA", "a.wav").await;
    write_audio_file(temp.path(), "langB", "b.wav").await;

    let engine = load(
        MockSpeechEngine::new()
            .with_delay(1)
            .with_transcript("a.wav", "[_SOT_]hello[_EOT_]")
            .with_transcript("b.wav", "world"),
    )
    .await;

    let config = batch_config(&temp, &["langA", "langB"]);
    let mut driver = BatchDriver::new(config.clone(), engine);
    let summary = driver.run().await.unwrap();

    assert_eq!(summary.total_jobs, 2);
    assert_eq!(summary.failed, 0);

    let content = tokio::fs::read_to_string(&config.report.output_path)
        .await
        .unwrap();
    let report: serde_json::Value = serde_json::from_str(&content).unwrap();
    let entries = report.as_array().unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["filename"], "a.wav");
    assert_eq!(entries[0]["language"], "langA");
    assert_eq!(entries[0]["transcription"], "hello");
    assert!(entries[0]["timeMs"].as_u64().is_some());
    assert_eq!(entries[0]["failed"], false);
    assert_eq!(entries[1]["filename"], "b.wav");
    assert_eq!(entries[1]["language"], "langB");
    assert_eq!(entries[1]["transcription"], "world");
    assert_eq!(entries[1]["failed"], false);
}

#[tokio::test(start_paused = true)]
async fn one_timeout_does_not_abort_the_batch() {
    let temp = TempDir::new().unwrap();
    write_audio_file(temp.path(), "arabic", "stuck.wav").await;
    write_audio_file(temp.path(), "arabic", "quick.wav").await;

    let engine = load(
        MockSpeechEngine::new()
            .with_delay(1)
            .with_silent("stuck.wav")
            .with_transcript("quick.wav", "done quickly"),
    )
    .await;

    let config = batch_config(&temp, &["arabic"]);
    let mut driver = BatchDriver::new(config.clone(), engine);
    let summary = driver.run().await.unwrap();

    assert_eq!(summary.total_jobs, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(driver.state(), DriverState::Terminated);

    let content = tokio::fs::read_to_string(&config.report.output_path)
        .await
        .unwrap();
    let entries: serde_json::Value = serde_json::from_str(&content).unwrap();

    // quick.wav sorts after stuck.wav within the language directory, so the
    // timed-out entry comes second in submission order
    assert_eq!(entries[0]["filename"], "quick.wav");
    assert_eq!(entries[0]["failed"], false);
    assert_eq!(entries[1]["filename"], "stuck.wav");
    assert_eq!(entries[1]["transcription"], "");
    assert_eq!(entries[1]["failed"], true);
}

#[tokio::test]
async fn missing_root_writes_no_report() {
    let temp = TempDir::new().unwrap();
    let mut config = batch_config(&temp, &["arabic"]);
    config.input.root_directory = temp.path().join("does-not-exist");

    let engine = load(MockSpeechEngine::new()).await;
    let mut driver = BatchDriver::new(config.clone(), engine);

    let result = driver.run().await;
    assert!(result.is_err());
    assert!(!config.report.output_path.exists());
    assert_ne!(driver.state(), DriverState::Draining);
}

#[tokio::test(start_paused = true)]
async fn engine_missing_file_yields_empty_transcript() {
    let temp = TempDir::new().unwrap();
    write_audio_file(temp.path(), "farsi", "ghost.wav").await;

    let engine = load(MockSpeechEngine::new().with_delay(1).with_missing("ghost.wav")).await;

    let config = batch_config(&temp, &["farsi"]);
    let mut driver = BatchDriver::new(config.clone(), engine);
    let summary = driver.run().await.unwrap();

    assert_eq!(summary.total_jobs, 1);
    assert_eq!(summary.failed, 1);

    let content = tokio::fs::read_to_string(&config.report.output_path)
        .await
        .unwrap();
    let entries: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(entries[0]["transcription"], "");
    assert_eq!(entries[0]["failed"], true);
}

#[tokio::test(start_paused = true)]
async fn skipped_language_directory_still_processes_the_rest() {
    let temp = TempDir::new().unwrap();
    write_audio_file(temp.path(), "arabic", "a.wav").await;
    // No farsi directory at all

    let engine = load(MockSpeechEngine::new().with_delay(1)).await;

    let config = batch_config(&temp, &["arabic", "farsi"]);
    let mut driver = BatchDriver::new(config, engine);
    let summary = driver.run().await.unwrap();

    assert_eq!(summary.total_jobs, 1);
    assert_eq!(summary.failed, 0);
}

#[tokio::test(start_paused = true)]
async fn report_keys_are_stable_and_pretty_printed() {
    let temp = TempDir::new().unwrap();
    write_audio_file(temp.path(), "arabic", "a.wav").await;

    let engine = load(MockSpeechEngine::new().with_delay(1).with_transcript("a.wav", "text")).await;

    let config = batch_config(&temp, &["arabic"]);
    let mut driver = BatchDriver::new(config.clone(), engine);
    driver.run().await.unwrap();

    let content = tokio::fs::read_to_string(&config.report.output_path)
        .await
        .unwrap();

    // 2-space pretty printing with stable key order
    let filename_pos = content.find("\"filename\"").unwrap();
    let language_pos = content.find("\"language\"").unwrap();
    let transcription_pos = content.find("\"transcription\"").unwrap();
    let time_pos = content.find("\"timeMs\"").unwrap();
    assert!(filename_pos < language_pos);
    assert!(language_pos < transcription_pos);
    assert!(transcription_pos < time_pos);
    assert!(content.starts_with("[\n  {"));
}
