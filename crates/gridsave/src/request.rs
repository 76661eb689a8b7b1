//! Export requests.

use bevy::prelude::*;

/// Identity of a connected observer session.  The serialized payload is
/// delivered to exactly this session, never broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// Request to export one grid as a loadable snapshot.  Immutable once the
/// pipeline accepts it.
#[derive(Event, Debug, Clone)]
pub struct ExportShipRequest {
    /// The grid root to export.
    pub root: Entity,
    /// Snapshot name; also the scratch file name stem.
    pub snapshot_name: String,
    /// Session the payload is delivered to.
    pub observer: SessionId,
    /// Card entity carrying the deed for `root`, if the requester presented
    /// one.  Validated at intake; every deed referencing the root is revoked
    /// after a successful save.
    pub deed_card: Option<Entity>,
}
