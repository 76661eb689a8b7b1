//! Energy storage cells.

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// An energy storage component.  Structurally required by the power network,
/// so sanitization resets the charge instead of stripping the component.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Battery {
    pub charge: f32,
    pub max_charge: f32,
}

impl Battery {
    pub fn new(max_charge: f32) -> Self {
        Self {
            charge: max_charge,
            max_charge,
        }
    }

    pub fn at_charge(max_charge: f32, charge: f32) -> Self {
        Self { charge, max_charge }
    }

    pub fn is_full(&self) -> bool {
        self.charge >= self.max_charge
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_battery_is_full() {
        assert!(Battery::new(100.0).is_full());
        assert!(!Battery::at_charge(100.0, 50.0).is_full());
    }
}
