//! Terminal outcomes and observability counters for export runs.

use bevy::prelude::*;

use crate::error::ExportStage;

/// What the pipeline did to the graph, for logs and assertions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportCounters {
    pub entities_removed: u32,
    pub containers_emptied: u32,
    pub components_stripped: u32,
    pub components_reset: u32,
}

/// Terminal result of one export run.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    /// Snapshot serialized and handed to the delivery channel.
    Success {
        /// Size of the delivered payload in bytes.
        payload_bytes: usize,
    },
    /// A stage aborted the run.  Cleanup still ran.
    Failed {
        stage: ExportStage,
        reason: String,
    },
}

impl ExportOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExportOutcome::Success { .. })
    }
}

/// Emitted exactly once per export run, after cleanup has finished.
#[derive(Event, Debug, Clone)]
pub struct ExportFinished {
    pub root: Entity,
    pub snapshot_name: String,
    pub outcome: ExportOutcome,
    pub counters: ExportCounters,
}
