use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::core::DashboardState;

#[cfg(test)]
#[path = "./output.tests.rs"]
mod output_tests;

pub const SNAPSHOT_FILE_NAME: &str = "dashboard.json";

/// Writes dashboard snapshots to a file in the output directory.
pub struct SnapshotWriter {
    path: PathBuf,
}

impl SnapshotWriter {
    /// Creates new [`SnapshotWriter`] instance, creating the output directory if needed.
    pub fn new(output_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Cannot create output directory {}", output_dir.display()))?;

        Ok(Self {
            path: output_dir.join(SNAPSHOT_FILE_NAME),
        })
    }

    /// Returns path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the snapshot file with the current dashboard state.
    pub fn write(&self, state: &DashboardState) -> Result<()> {
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, to_json(state)?)?;
        std::fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }
}

/// Serializes dashboard state as pretty JSON.
pub fn to_json(state: &DashboardState) -> Result<String> {
    Ok(serde_json::to_string_pretty(state)?)
}
