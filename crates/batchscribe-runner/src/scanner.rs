//! Discovery of audio files under language-labeled directories

use crate::error::{Result, RunnerError};
use batchscribe_core::config::InputConfig;
use batchscribe_core::types::AudioJob;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Walks the configured language directories and produces one [`AudioJob`]
/// per file with a recognized audio extension.
#[derive(Debug)]
pub struct DirectoryScanner {
    /// Input discovery configuration
    config: InputConfig,
}

impl DirectoryScanner {
    /// Create a new scanner
    #[must_use]
    pub const fn new(config: InputConfig) -> Self {
        Self { config }
    }

    /// Discover all audio files under the configured root.
    ///
    /// Language subdirectories that do not exist are skipped with a warning.
    /// Discovery order follows the configured language list; within each
    /// language the entries are sorted by path when `sort_entries` is set,
    /// otherwise filesystem listing order applies.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::InputDirectoryNotFound`] if the root directory
    /// itself is absent, in which case the batch must not run.
    pub async fn scan(&self) -> Result<Vec<AudioJob>> {
        let root = &self.config.root_directory;
        if !root.is_dir() {
            return Err(RunnerError::input_directory_not_found(root.clone()));
        }

        info!(root = %root.display(), "Scanning for audio files");

        let mut jobs = Vec::new();
        for language in &self.config.language_dirs {
            let language_dir = root.join(language);
            if !language_dir.is_dir() {
                warn!(
                    directory = %language_dir.display(),
                    "Language directory not found, skipping"
                );
                continue;
            }

            debug!(directory = %language_dir.display(), "Scanning directory");

            let mut files = Vec::new();
            self.scan_directory(&language_dir, &mut files, 0).await?;

            if self.config.sort_entries {
                files.sort();
            }

            for path in files {
                debug!(
                    path = %path.display(),
                    language,
                    "Discovered audio file"
                );
                jobs.push(AudioJob::new(path, language));
            }
        }

        info!("Found {} audio files", jobs.len());
        Ok(jobs)
    }

    /// Recursively collect matching files under a directory
    #[async_recursion::async_recursion]
    async fn scan_directory(
        &self,
        directory: &Path,
        files: &mut Vec<PathBuf>,
        depth: usize,
    ) -> Result<()> {
        if depth > self.config.max_depth {
            warn!(
                directory = %directory.display(),
                "Maximum directory depth reached"
            );
            return Ok(());
        }

        let mut entries = match tokio::fs::read_dir(directory).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    directory = %directory.display(),
                    error = %e,
                    "Failed to read directory"
                );
                return Ok(()); // Continue with other directories
            }
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();

            if path.is_dir() {
                self.scan_directory(&path, files, depth + 1).await?;
            } else if path.is_file() && self.matches_extension(&path) {
                files.push(path);
            }
        }

        Ok(())
    }

    /// Whether the file's lowercased name ends in an allowed extension
    fn matches_extension(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
            return false;
        };
        let name = name.to_lowercase();

        self.config
            .file_extensions
            .iter()
            .any(|ext| name.ends_with(&format!(".{}", ext.to_lowercase())))
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn test_config(root: PathBuf, languages: &[&str]) -> InputConfig {
        InputConfig {
            root_directory: root,
            language_dirs: languages.iter().map(ToString::to_string).collect(),
            file_extensions: ["wav", "mp3", "m4a", "flac", "ogg"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            sort_entries: true,
            max_depth: 10,
        }
    }

    #[tokio::test]
    async fn test_missing_root_fails() {
        let config = test_config(PathBuf::from("/nonexistent/audio"), &["arabic"]);
        let scanner = DirectoryScanner::new(config);

        let result = scanner.scan().await;
        assert!(matches!(
            result,
            Err(RunnerError::InputDirectoryNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_language_dir_skipped() {
        let temp_dir = TempDir::new().unwrap();
        tokio::fs::create_dir(temp_dir.path().join("arabic"))
            .await
            .unwrap();
        tokio::fs::write(temp_dir.path().join("arabic/a.wav"), b"audio")
            .await
            .unwrap();

        let config = test_config(temp_dir.path().to_path_buf(), &["arabic", "farsi"]);
        let scanner = DirectoryScanner::new(config);

        let jobs = scanner.scan().await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].language, "arabic");
    }

    #[tokio::test]
    async fn test_extension_filtering() {
        let temp_dir = TempDir::new().unwrap();
        let lang_dir = temp_dir.path().join("arabic");
        tokio::fs::create_dir(&lang_dir).await.unwrap();

        for name in ["a.wav", "b.MP3", "c.flac", "d.txt", "e.tflite", "f.OGG"] {
            tokio::fs::write(lang_dir.join(name), b"content").await.unwrap();
        }

        let config = test_config(temp_dir.path().to_path_buf(), &["arabic"]);
        let scanner = DirectoryScanner::new(config);

        let jobs = scanner.scan().await.unwrap();
        let names: Vec<String> = jobs.iter().map(AudioJob::filename).collect();
        assert_eq!(names, vec!["a.wav", "b.MP3", "c.flac", "f.OGG"]);
    }

    #[tokio::test]
    async fn test_recursive_discovery() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("farsi/speaker1/session2");
        tokio::fs::create_dir_all(&nested).await.unwrap();
        tokio::fs::write(nested.join("deep.m4a"), b"audio")
            .await
            .unwrap();
        tokio::fs::write(temp_dir.path().join("farsi/top.wav"), b"audio")
            .await
            .unwrap();

        let config = test_config(temp_dir.path().to_path_buf(), &["farsi"]);
        let scanner = DirectoryScanner::new(config);

        let jobs = scanner.scan().await.unwrap();
        assert_eq!(jobs.len(), 2);
        assert!(jobs.iter().all(|j| j.language == "farsi"));
    }

    #[tokio::test]
    async fn test_language_order_preserved() {
        let temp_dir = TempDir::new().unwrap();
        for (lang, file) in [("langb", "b.wav"), ("langa", "a.wav")] {
            let dir = temp_dir.path().join(lang);
            tokio::fs::create_dir(&dir).await.unwrap();
            tokio::fs::write(dir.join(file), b"audio").await.unwrap();
        }

        // Discovery order follows the configured language list, not
        // alphabetical order of directory names.
        let config = test_config(temp_dir.path().to_path_buf(), &["langb", "langa"]);
        let scanner = DirectoryScanner::new(config);

        let jobs = scanner.scan().await.unwrap();
        let languages: Vec<&str> = jobs.iter().map(|j| j.language.as_str()).collect();
        assert_eq!(languages, vec!["langb", "langa"]);
    }

    #[tokio::test]
    async fn test_sorted_within_language() {
        let temp_dir = TempDir::new().unwrap();
        let lang_dir = temp_dir.path().join("arabic");
        tokio::fs::create_dir(&lang_dir).await.unwrap();
        for name in ["c.wav", "a.wav", "b.wav"] {
            tokio::fs::write(lang_dir.join(name), b"audio").await.unwrap();
        }

        let config = test_config(temp_dir.path().to_path_buf(), &["arabic"]);
        let scanner = DirectoryScanner::new(config);

        let jobs = scanner.scan().await.unwrap();
        let names: Vec<String> = jobs.iter().map(AudioJob::filename).collect();
        assert_eq!(names, vec!["a.wav", "b.wav", "c.wav"]);
    }

    #[tokio::test]
    async fn test_empty_language_dir() {
        let temp_dir = TempDir::new().unwrap();
        tokio::fs::create_dir(temp_dir.path().join("arabic"))
            .await
            .unwrap();

        let config = test_config(temp_dir.path().to_path_buf(), &["arabic"]);
        let scanner = DirectoryScanner::new(config);

        let jobs = scanner.scan().await.unwrap();
        assert!(jobs.is_empty());
    }
}
