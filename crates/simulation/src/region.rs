//! Spatial regions: independent areas of space that host grids and
//! free-floating entities.
//!
//! Regions are plain entities.  A [`Position`] pointing at a region entity
//! means "this thing is in that region".  Destroying a region removes its
//! remaining occupants, cascading through each occupant's own subtree.

use bevy::prelude::*;

use crate::graph;
use crate::grid::Position;

/// Marker component for region entities.
#[derive(Component, Debug, Clone)]
pub struct Region {
    /// Human-readable label, used only in logs.
    pub label: String,
}

/// Spawn a new, empty region.
pub fn spawn_region(world: &mut World, label: impl Into<String>) -> Entity {
    let label = label.into();
    let region = world.spawn(Region { label: label.clone() }).id();
    info!("Spawned region {region} ({label})");
    region
}

/// Despawn a region and every entity positioned in it.  Returns `false` if
/// the region entity no longer exists (already torn down).
pub fn despawn_region(world: &mut World, region: Entity) -> bool {
    if world.get_entity(region).is_err() {
        return false;
    }

    // Occupants are anything positioned in the region.  Collect first, then
    // delete: deletion cascades and mutates the queried set.
    let occupants: Vec<Entity> = {
        let mut q = world.query::<(Entity, &Position)>();
        q.iter(world)
            .filter(|(_, pos)| pos.region == region)
            .map(|(e, _)| e)
            .collect()
    };

    for occupant in occupants {
        graph::delete_entity(world, occupant);
    }

    world.despawn(region);
    true
}
