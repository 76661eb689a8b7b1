//! Session-bound components: state that exists only while a live player is
//! attached to an entity.  None of this belongs in a snapshot.

use bevy::prelude::*;

/// Binds an entity to a live controller session.
#[derive(Component, Debug, Clone)]
pub struct Controlled {
    pub session: String,
}

/// Perception viewpoint for an attached session.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Viewpoint;
