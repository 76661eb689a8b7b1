//! Outbound events: payload delivery and the completion notification.

use bevy::prelude::*;

use crate::request::SessionId;

/// Fire-and-forget delivery of the serialized snapshot to the requesting
/// observer.  The network layer forwards this to exactly one session; nothing
/// in this crate waits for an acknowledgment.
#[derive(Event, Debug, Clone)]
pub struct SnapshotDelivered {
    pub observer: SessionId,
    pub snapshot_name: String,
    pub payload: Vec<u8>,
}

/// Published when an export reaches Finalize, before cleanup.  Observed by
/// ownership bookkeeping (deed revocation) and anything else that reacts to a
/// ship leaving the world.
#[derive(Event, Debug, Clone)]
pub struct ExportCompleted {
    pub root: Entity,
    pub snapshot_name: String,
    pub owner: Option<String>,
    pub observer: SessionId,
}
