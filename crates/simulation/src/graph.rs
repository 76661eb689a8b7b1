//! Mutation helpers over the live entity graph.
//!
//! Deletion cascades the way the engine's own despawn would: through item
//! containers and, for grid roots, through everything aboard.  Every helper
//! tolerates already-dead entities; "no longer exists" is an expected
//! condition here, never an error.

use bevy::prelude::*;

use crate::container::{InsideContainer, ItemContainer};
use crate::grid::{Grid, GridLocal, Orientation, Position};

/// Whether `entity` is still alive in the world.
pub fn entity_exists(world: &World, entity: Entity) -> bool {
    world.get_entity(entity).is_ok()
}

/// Delete an entity and its dependents:
/// - items inside its containers (recursively),
/// - for grid roots, every entity aboard the grid,
/// - and unlink it from its parent container's slot list.
///
/// Safe to call on entities that are already gone.
pub fn delete_entity(world: &mut World, entity: Entity) {
    if !entity_exists(world, entity) {
        return;
    }

    // Unlink from parent container first so the parent never holds a stale ref.
    if let Some(&InsideContainer(parent)) = world.get::<InsideContainer>(entity) {
        if let Some(mut slots) = world.get_mut::<ItemContainer>(parent) {
            slots.items.retain(|&i| i != entity);
        }
    }

    // Cascade through own container contents.
    let contained: Vec<Entity> = world
        .get::<ItemContainer>(entity)
        .map(|c| c.items.clone())
        .unwrap_or_default();
    for item in contained {
        delete_entity(world, item);
    }

    // Grid roots take everything aboard with them.
    if world.get::<Grid>(entity).is_some() {
        let aboard: Vec<Entity> = {
            let mut q = world.query::<(Entity, &GridLocal)>();
            q.iter(world)
                .filter(|(_, loc)| loc.grid == entity)
                .map(|(e, _)| e)
                .collect()
        };
        for e in aboard {
            delete_entity(world, e);
        }
    }

    world.despawn(entity);
}

/// Move a grid root into `region` at `local`, zeroing its rotation.  Entities
/// aboard are grid-relative and follow for free.  Returns `false` if the root
/// no longer exists.
pub fn relocate_grid(world: &mut World, root: Entity, region: Entity, local: Vec2) -> bool {
    let Ok(mut e) = world.get_entity_mut(root) else {
        return false;
    };
    e.insert((Position { region, local }, Orientation(0.0)));
    true
}
