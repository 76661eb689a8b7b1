//! Scratch region lifecycle.
//!
//! One isolated region per export run.  Acquire is cheap and fails fast (it
//! only spawns an entity); release is idempotent and safe after a partial
//! acquire, acting only on resources that actually exist.

use bevy::prelude::*;

use simulation::region::{despawn_region, spawn_region};

/// Handle to a scratch region owned by a single export run.
#[derive(Debug, Clone, Copy)]
pub struct ScratchRegion {
    pub region: Entity,
}

/// Create a fresh, empty region to host the subgraph during export.
pub fn acquire(world: &mut World, snapshot_name: &str) -> ScratchRegion {
    let region = spawn_region(world, format!("scratch-export:{snapshot_name}"));
    ScratchRegion { region }
}

/// Tear the scratch region down, removing any remaining occupants.  Calling
/// this twice, or for a region something else already destroyed, is a no-op.
pub fn release(world: &mut World, handle: ScratchRegion) -> bool {
    let destroyed = despawn_region(world, handle.region);
    if destroyed {
        info!("Released scratch region {}", handle.region);
    }
    destroyed
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::Vec2;
    use simulation::grid::{Grid, Position};

    #[test]
    fn test_acquire_creates_empty_region() {
        let mut world = World::new();
        let handle = acquire(&mut world, "test");
        assert!(world.get_entity(handle.region).is_ok());
    }

    #[test]
    fn test_release_removes_region_and_occupants() {
        let mut world = World::new();
        let handle = acquire(&mut world, "test");
        let stray = world
            .spawn((
                Grid::default(),
                Position {
                    region: handle.region,
                    local: Vec2::ZERO,
                },
            ))
            .id();

        assert!(release(&mut world, handle));
        assert!(world.get_entity(handle.region).is_err());
        assert!(world.get_entity(stray).is_err());
    }

    #[test]
    fn test_double_release_is_safe() {
        let mut world = World::new();
        let handle = acquire(&mut world, "test");
        assert!(release(&mut world, handle));
        assert!(!release(&mut world, handle));
    }
}
