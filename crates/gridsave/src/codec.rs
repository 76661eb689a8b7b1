//! Snapshot codec: collect a sanitized grid into a serializable form, encode
//! it to scratch-file bytes, and spawn it back into a region on load.
//!
//! Wire form: bitcode-encoded [`ShipSnapshot`], lz4 block-compressed, wrapped
//! in the checksummed header from [`crate::snapshot_header`].  The codec is
//! orientation-sensitive: it refuses grids whose rotation was not normalized,
//! so a reloaded ship reproduces the pre-save layout no matter where in world
//! space the save happened.

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use simulation::battery::Battery;
use simulation::container::ItemContainer;
use simulation::graph::entity_exists;
use simulation::grid::{Anchored, Grid, GridBounds, GridLocal, Orientation, Position};
use simulation::spatial::grid_subgraph;

use crate::error::ExportError;
use crate::snapshot_header::{unwrap_header, wrap_with_header, FLAG_COMPRESSED};

// ---------------------------------------------------------------------------
// Snapshot types
// ---------------------------------------------------------------------------

/// One serialized entity aboard the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SnapshotEntity {
    pub offset_x: f32,
    pub offset_y: f32,
    pub anchored: bool,
    /// Entity carries (empty) container slots.
    pub has_container: bool,
    pub battery: Option<Battery>,
}

/// Serialized form of a sanitized grid subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct ShipSnapshot {
    pub name: String,
    pub bounds: GridBounds,
    pub entities: Vec<SnapshotEntity>,
}

// ---------------------------------------------------------------------------
// Collect / spawn
// ---------------------------------------------------------------------------

/// Read the grid's current subtree out of the world.  Expects a sanitized
/// grid: rotation normalized to zero, containers already emptied.
pub fn collect_snapshot(
    world: &mut World,
    root: Entity,
    name: &str,
) -> Result<ShipSnapshot, ExportError> {
    if !entity_exists(world, root) {
        return Err(ExportError::RootVanished);
    }
    let Some(grid) = world.get::<Grid>(root) else {
        return Err(ExportError::NotAGrid);
    };
    let bounds = grid.bounds;

    if let Some(&Orientation(angle)) = world.get::<Orientation>(root) {
        if angle != 0.0 {
            return Err(ExportError::Encode(format!(
                "grid rotation {angle} not normalized; serializer is orientation-sensitive"
            )));
        }
    }

    let members = grid_subgraph(world, root);
    let mut entities = Vec::with_capacity(members.len());
    for entity in members {
        // Contained items carry no grid placement; a sanitized grid has none
        // left, but membership is computed live, so skip rather than assume.
        let Some(local) = world.get::<GridLocal>(entity) else {
            continue;
        };
        entities.push(SnapshotEntity {
            offset_x: local.offset.x,
            offset_y: local.offset.y,
            anchored: world.get::<Anchored>(entity).is_some(),
            has_container: world.get::<ItemContainer>(entity).is_some(),
            battery: world.get::<Battery>(entity).copied(),
        });
    }

    // Deterministic output for identical world state.
    entities.sort_by(|a, b| {
        (a.offset_x, a.offset_y)
            .partial_cmp(&(b.offset_x, b.offset_y))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(ShipSnapshot {
        name: name.to_string(),
        bounds,
        entities,
    })
}

/// Spawn a snapshot into `region` at the origin.  Returns the new grid root.
pub fn spawn_snapshot(world: &mut World, region: Entity, snapshot: &ShipSnapshot) -> Entity {
    let root = world
        .spawn((
            Grid {
                bounds: snapshot.bounds,
            },
            Position {
                region,
                local: Vec2::ZERO,
            },
            Orientation(0.0),
        ))
        .id();

    for entry in &snapshot.entities {
        let mut e = world.spawn(GridLocal {
            grid: root,
            offset: Vec2::new(entry.offset_x, entry.offset_y),
        });
        if entry.anchored {
            e.insert(Anchored);
        }
        if entry.has_container {
            e.insert(ItemContainer::default());
        }
        if let Some(battery) = entry.battery {
            e.insert(battery);
        }
    }

    info!(
        "Spawned snapshot '{}' ({} entities) into region {region}",
        snapshot.name,
        snapshot.entities.len()
    );
    root
}

// ---------------------------------------------------------------------------
// Encode / decode
// ---------------------------------------------------------------------------

/// Encode to final file bytes: bitcode -> lz4 -> header.
pub fn encode_snapshot(snapshot: &ShipSnapshot) -> Vec<u8> {
    let encoded = bitcode::encode(snapshot);
    let compressed = lz4_flex::compress_prepend_size(&encoded);
    wrap_with_header(&compressed, FLAG_COMPRESSED, encoded.len() as u32)
}

/// Decode file bytes back into a snapshot, validating header and checksum.
pub fn decode_snapshot(bytes: &[u8]) -> Result<ShipSnapshot, ExportError> {
    let (header, payload) = unwrap_header(bytes)?;

    let encoded = if header.flags & FLAG_COMPRESSED != 0 {
        lz4_flex::decompress_size_prepended(payload)
            .map_err(|e| ExportError::Decode(format!("lz4 decompression failed: {e}")))?
    } else {
        payload.to_vec()
    };

    if encoded.len() as u32 != header.uncompressed_size {
        return Err(ExportError::Decode(format!(
            "uncompressed size mismatch: header says {}, got {}",
            header.uncompressed_size,
            encoded.len()
        )));
    }

    bitcode::decode(&encoded).map_err(|e| ExportError::Decode(e.to_string()))
}

// ---------------------------------------------------------------------------
// Scratch file I/O
// ---------------------------------------------------------------------------

/// Write snapshot bytes with the write-rename pattern so a crash mid-write
/// never leaves a torn scratch file.
pub fn write_snapshot_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp_path = path.with_extension("tmp");
    let mut file = File::create(&tmp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

pub fn read_snapshot_file(path: &Path) -> std::io::Result<Vec<u8>> {
    fs::read(path)
}

/// Delete the scratch file.  A file that is already gone counts as success.
pub fn delete_snapshot_file(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
