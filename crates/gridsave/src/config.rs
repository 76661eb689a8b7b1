//! Export pipeline configuration.
//!
//! Grace delays and retry backoff are tick-denominated and configurable; the
//! defaults match the behavior the rest of the server has been tuned against.

use bevy::prelude::*;
use std::path::PathBuf;

/// File extension for scratch snapshot files.
pub const SNAPSHOT_EXT: &str = "shipsnap";

#[derive(Resource, Debug, Clone)]
pub struct ExportConfig {
    /// Directory holding scratch snapshot files while an export is in flight.
    pub scratch_dir: PathBuf,
    /// Ticks to wait before tearing down the scratch region, so dependent
    /// systems can finish reacting to the relocation and deletions.
    pub region_grace_ticks: u32,
    /// Ticks to wait after region teardown before force-deleting a root that
    /// is still alive.
    pub root_grace_ticks: u32,
    /// Attempts for deleting the scratch file before giving up (non-fatal).
    pub delete_retry_attempts: u32,
    /// Delay before the first scratch-file delete retry; doubles per attempt.
    pub delete_retry_first_delay_ticks: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            scratch_dir: std::env::temp_dir().join("gridsave_scratch"),
            region_grace_ticks: 5,
            root_grace_ticks: 3,
            delete_retry_attempts: 3,
            delete_retry_first_delay_ticks: 2,
        }
    }
}

impl ExportConfig {
    /// Scratch file path for a snapshot name: `<scratch_dir>/<name>.shipsnap`.
    pub fn scratch_file(&self, snapshot_name: &str) -> PathBuf {
        self.scratch_dir
            .join(format!("{snapshot_name}.{SNAPSHOT_EXT}"))
    }
}
