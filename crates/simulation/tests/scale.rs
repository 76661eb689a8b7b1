//! Scale tests for the entity graph: membership queries and cascading
//! deletion must stay correct when a grid carries tens of thousands of
//! entities.
//!
//! Run: cargo test -p simulation --test scale

use std::time::Instant;

use bevy::math::Vec2;
use bevy::prelude::*;

use simulation::container::insert_into;
use simulation::graph::delete_entity;
use simulation::grid::{Anchored, Grid, GridBounds, GridLocal, Position};
use simulation::region::{despawn_region, spawn_region};
use simulation::spatial::grid_subgraph;

fn big_grid(world: &mut World, members: usize) -> (Entity, Vec<Entity>) {
    let region = spawn_region(world, "scale");
    let root = world
        .spawn((
            Grid {
                bounds: GridBounds::from_half_extent(128.0),
            },
            Position {
                region,
                local: Vec2::ZERO,
            },
        ))
        .id();

    let mut aboard = Vec::with_capacity(members);
    for i in 0..members {
        let x = (i % 200) as f32 - 100.0;
        let y = (i / 200) as f32 - 100.0;
        aboard.push(
            world
                .spawn((
                    GridLocal {
                        grid: root,
                        offset: Vec2::new(x, y),
                    },
                    Anchored,
                ))
                .id(),
        );
    }
    (root, aboard)
}

#[test]
fn test_subgraph_of_50k_members() {
    let mut world = World::new();
    let (root, aboard) = big_grid(&mut world, 50_000);

    let start = Instant::now();
    let members = grid_subgraph(&mut world, root);
    let elapsed = start.elapsed();

    assert_eq!(members.len(), aboard.len());
    assert!(!members.contains(&root));
    println!("grid_subgraph over 50K members: {elapsed:?}");
}

#[test]
fn test_root_deletion_cascades_through_10k_members() {
    let mut world = World::new();
    let (root, aboard) = big_grid(&mut world, 10_000);

    // Deep container nesting on top of the spatial membership.
    let locker = aboard[0];
    let mut parent = locker;
    let mut nested = Vec::new();
    for _ in 0..100 {
        let item = world.spawn_empty().id();
        insert_into(&mut world, parent, item);
        nested.push(item);
        parent = item;
    }

    let start = Instant::now();
    delete_entity(&mut world, root);
    let elapsed = start.elapsed();

    assert!(world.get_entity(root).is_err());
    for entity in aboard.iter().chain(&nested) {
        assert!(world.get_entity(*entity).is_err());
    }
    println!("cascading delete of 10K members: {elapsed:?}");
}

#[test]
fn test_region_teardown_with_many_grids() {
    let mut world = World::new();
    let region = spawn_region(&mut world, "busy");
    let mut roots = Vec::new();
    for _ in 0..50 {
        let root = world
            .spawn((
                Grid::default(),
                Position {
                    region,
                    local: Vec2::ZERO,
                },
            ))
            .id();
        for i in 0..100 {
            world.spawn(GridLocal {
                grid: root,
                offset: Vec2::new(i as f32 % 10.0, i as f32 / 10.0),
            });
        }
        roots.push(root);
    }

    assert!(despawn_region(&mut world, region));
    let mut locals = world.query::<&GridLocal>();
    assert_eq!(locals.iter(&world).count(), 0);
    for root in roots {
        assert!(world.get_entity(root).is_err());
    }
}
