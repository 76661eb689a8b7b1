//! Stage 2: bulk content purge.
//!
//! Two sub-passes over the subgraph, with membership recomputed in between
//! because the first sub-pass changes it:
//!
//! 1. empty every container (contents are session-bound, never serialized);
//! 2. delete every remaining entity that is neither anchored nor inside a
//!    container — loose entities are transient clutter, not structure.

use bevy::prelude::*;

use simulation::container::{container_contents, is_inside_any_container};
use simulation::graph::{delete_entity, entity_exists};
use simulation::grid::{Anchored, Grid};
use simulation::spatial::grid_subgraph;

use crate::outcome::ExportCounters;

pub fn purge_contents(world: &mut World, root: Entity, counters: &mut ExportCounters) {
    // Sub-pass 1: empty containers.
    let members = grid_subgraph(world, root);
    for entity in &members {
        if !entity_exists(world, *entity) {
            continue;
        }
        let contents = container_contents(world, *entity);
        if contents.is_empty() {
            continue;
        }
        let mut emptied = 0u32;
        for item in contents {
            if entity_exists(world, item) {
                delete_entity(world, item);
                emptied += 1;
            }
        }
        if emptied > 0 {
            counters.entities_removed += emptied;
            counters.containers_emptied += 1;
            info!("Emptied container {entity} ({emptied} items)");
        }
    }

    // Sub-pass 2: delete loose entities.  Fresh membership; sub-pass 1
    // deleted entities and the ambient simulation may have, too.
    let members = grid_subgraph(world, root);
    let mut loose_removed = 0u32;
    for entity in members {
        if !entity_exists(world, entity) {
            continue;
        }
        if world.get::<Grid>(entity).is_some() {
            continue;
        }
        if world.get::<Anchored>(entity).is_some() || is_inside_any_container(world, entity) {
            continue;
        }
        delete_entity(world, entity);
        loose_removed += 1;
    }
    counters.entities_removed += loose_removed;
    info!("Purged {loose_removed} loose entities from grid {root}");
}
