//! Precondition gate resolved before the batch driver may start
//!
//! Mirrors the platform's access-and-readiness negotiation: the report
//! destination must be writable, model assets must be provisioned, and the
//! engine must be loaded and settled. The driver does not run until this
//! resolves.

use crate::assets;
use crate::error::Result;
use batchscribe_core::BatchConfig;
use batchscribe_engine::SpeechEngine;
use tracing::info;

/// Resolve all preconditions for a batch run.
///
/// # Errors
///
/// Returns an error if the report destination cannot be created, asset
/// provisioning fails, or the engine fails to load. Any of these prevents
/// the batch from starting; none of them is reported in the JSON output.
pub async fn ensure_ready(config: &BatchConfig, engine: &mut dyn SpeechEngine) -> Result<()> {
    if let Some(parent) = config.report.output_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let provisioned = assets::provision_assets(&config.assets).await?;

    engine.load(&config.engine).await?;

    // Give the engine a moment to settle after the load reports complete
    let settle = config.engine.startup_settle();
    if !settle.is_zero() {
        tokio::time::sleep(settle).await;
    }

    info!(
        engine = engine.name(),
        provisioned_assets = provisioned,
        "Preflight complete, batch may start"
    );

    Ok(())
}
