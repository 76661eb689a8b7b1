//! Atmospheric device state.

use bevy::prelude::*;

/// Mid-simulation gas exchange state for a device (a vent, a scrubber).
/// Represents a physical process in flight; reloading it as "already in
/// progress" is meaningless, so sanitization strips it.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct GasExchanger {
    /// Pressure differential currently being equalized.
    pub pressure_delta: f32,
}
