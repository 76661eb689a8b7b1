//! Interactive dispensing machinery (vendors, fabricators).
//!
//! Dispensers hold spawn-on-demand inventory tied to the running round, which
//! cannot be reproduced on reload.  The export pipeline deletes them outright.

use bevy::prelude::*;

#[derive(Component, Debug, Clone, Default)]
pub struct Dispenser {
    /// Remaining stock in the machine.
    pub stock: u32,
}
