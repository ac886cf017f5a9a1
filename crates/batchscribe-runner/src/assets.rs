//! One-time provisioning of model assets into the working directory

use crate::error::Result;
use batchscribe_core::config::AssetsConfig;
use std::path::Path;
use tracing::{debug, info};

/// Copy asset files with configured extensions from the source directory
/// into the working directory, skipping files that already exist.
///
/// Returns the number of files copied. A missing or unset source directory
/// is not an error; provisioning is simply skipped.
///
/// # Errors
///
/// Returns an error if a directory cannot be read or a copy fails.
pub async fn provision_assets(config: &AssetsConfig) -> Result<usize> {
    let Some(source) = &config.source_directory else {
        debug!("No asset source configured, skipping provisioning");
        return Ok(0);
    };
    let Some(destination) = &config.working_directory else {
        debug!("No working directory configured, skipping provisioning");
        return Ok(0);
    };

    if !source.is_dir() {
        debug!(
            source = %source.display(),
            "Asset source directory not found, skipping provisioning"
        );
        return Ok(0);
    }

    tokio::fs::create_dir_all(destination).await?;

    let mut copied = 0;
    let mut entries = tokio::fs::read_dir(source).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !path.is_file() || !matches_extension(&path, &config.extensions) {
            continue;
        }

        let Some(file_name) = path.file_name() else {
            continue;
        };
        let target = destination.join(file_name);
        if target.exists() {
            debug!(asset = %target.display(), "Asset already provisioned");
            continue;
        }

        tokio::fs::copy(&path, &target).await?;
        debug!(
            from = %path.display(),
            to = %target.display(),
            "Provisioned asset"
        );
        copied += 1;
    }

    info!(copied, destination = %destination.display(), "Asset provisioning complete");
    Ok(copied)
}

/// Whether the file's extension is in the configured allow-list
fn matches_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}
