mod codec;
mod config;
mod delivery;
mod error;
mod outcome;
mod pipeline;
mod plugin;
mod purge;
mod request;
mod retry;
mod sanitize;
mod scratch;
mod snapshot_header;

#[cfg(test)]
mod test_harness;

pub use codec::{collect_snapshot, decode_snapshot, spawn_snapshot, ShipSnapshot, SnapshotEntity};
pub use config::{ExportConfig, SNAPSHOT_EXT};
pub use delivery::{ExportCompleted, SnapshotDelivered};
pub use error::{ExportError, ExportStage};
pub use outcome::{ExportCounters, ExportFinished, ExportOutcome};
pub use plugin::GridSavePlugin;
pub use request::{ExportShipRequest, SessionId};
