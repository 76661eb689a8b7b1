//! Ownership deeds.
//!
//! A deed is a credential component attached to a physical card entity; it
//! records who may later reclaim the ship it references.  The export pipeline
//! revokes every deed pointing at an exported root.

use bevy::prelude::*;

#[derive(Component, Debug, Clone)]
pub struct Deed {
    /// The grid root this deed grants rights over.
    pub ship: Entity,
    /// Owner identity, as the lobby layer knows it.
    pub owner: String,
}
