//! Grid (ship) root entities and placement aboard them.
//!
//! A "grid" is the top-level entity for a player structure: a hull with a
//! local AABB.  Entities aboard a grid are placed grid-relative via
//! [`GridLocal`], so relocating the root carries the whole structure with it.

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_HULL_HALF_EXTENT;

/// Local axis-aligned bounds of a grid, in grid-relative coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct GridBounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl GridBounds {
    pub fn from_half_extent(half: f32) -> Self {
        Self {
            min_x: -half,
            min_y: -half,
            max_x: half,
            max_y: half,
        }
    }

    pub fn contains(&self, offset: Vec2) -> bool {
        offset.x >= self.min_x
            && offset.x <= self.max_x
            && offset.y >= self.min_y
            && offset.y <= self.max_y
    }
}

impl Default for GridBounds {
    fn default() -> Self {
        Self::from_half_extent(DEFAULT_HULL_HALF_EXTENT)
    }
}

/// Marker + bounds for a root grid entity.
#[derive(Component, Debug, Clone, Default)]
pub struct Grid {
    pub bounds: GridBounds,
}

/// World placement of a grid root (or any free-floating entity): which region
/// it occupies and where inside that region.
#[derive(Component, Debug, Clone, Copy)]
pub struct Position {
    pub region: Entity,
    pub local: Vec2,
}

/// Rotation of a grid root, in radians.  The snapshot codec only accepts
/// zero-rotation grids, so the pipeline normalizes this before serializing.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Orientation(pub f32);

/// Placement of an entity aboard a grid, in grid-relative coordinates.
#[derive(Component, Debug, Clone, Copy)]
pub struct GridLocal {
    pub grid: Entity,
    pub offset: Vec2,
}

/// Marker for entities bolted to the structure.  Anchored entities survive
/// the loose-entity purge and are part of the serialized structure.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Anchored;
