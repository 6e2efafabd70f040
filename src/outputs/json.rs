//! JSON snapshot output.
//!
//! Serializes one fetch cycle to `events.json` for downstream consumers:
//!
//! ```text
//! output_dir/
//! └── events.json   # { "last_updated": ..., "total_events": N, "events": [...] }
//! ```

use crate::models::EventsSnapshot;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

pub const SNAPSHOT_FILENAME: &str = "events.json";

/// Render a snapshot as pretty-printed JSON.
pub fn render_snapshot(snapshot: &EventsSnapshot) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(snapshot)
}

/// Write a snapshot to `{output_dir}/events.json`, creating the directory.
///
/// # Arguments
///
/// * `snapshot` - The finished fetch cycle
/// * `output_dir` - Directory to write into; created when missing
///
/// # Returns
///
/// The path of the written file.
///
/// # Errors
///
/// Serialization failures and filesystem errors are returned as-is.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.as_ref().display()))]
pub async fn write_snapshot(
    snapshot: &EventsSnapshot,
    output_dir: impl AsRef<Path>,
) -> Result<PathBuf, Box<dyn Error>> {
    let output_dir = output_dir.as_ref();
    let json = render_snapshot(snapshot)?;

    if let Err(e) = fs::create_dir_all(output_dir).await {
        error!(error = %e, "Failed to create output dir");
        return Err(e.into());
    }

    let path = output_dir.join(SNAPSHOT_FILENAME);
    fs::write(&path, json).await?;
    info!(path = %path.display(), events = snapshot.total_events, "Wrote events snapshot");

    Ok(path)
}
