//! Subgraph membership queries.
//!
//! Membership is always computed fresh from the live world: spatial members
//! (aboard the grid, inside its bounds) plus the transitive contents of their
//! containers.  Callers must re-query after any mutating pass; entities
//! deleted in between simply stop appearing.

use bevy::prelude::*;
use std::collections::HashSet;

use crate::container::ItemContainer;
use crate::grid::{Grid, GridLocal};

/// All entities spatially or logically contained by `root` right now.
/// The root itself is never a member.  Returns an empty set if the root is
/// gone or is not a grid.
pub fn grid_subgraph(world: &mut World, root: Entity) -> HashSet<Entity> {
    let mut members = HashSet::new();

    let Some(grid) = world.get::<Grid>(root) else {
        return members;
    };
    let bounds = grid.bounds;

    // Spatial pass: aboard the grid and inside the hull bounds.
    {
        let mut q = world.query::<(Entity, &GridLocal)>();
        for (entity, local) in q.iter(world) {
            if local.grid == root && bounds.contains(local.offset) {
                members.insert(entity);
            }
        }
    }

    // Logical pass: transitive container contents of every spatial member.
    let mut frontier: Vec<Entity> = members.iter().copied().collect();
    while let Some(entity) = frontier.pop() {
        let contents: Vec<Entity> = world
            .get::<ItemContainer>(entity)
            .map(|c| c.items.clone())
            .unwrap_or_default();
        for item in contents {
            if world.get_entity(item).is_ok() && members.insert(item) {
                frontier.push(item);
            }
        }
    }

    members.remove(&root);
    members
}
