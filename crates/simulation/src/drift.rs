//! Ambient drift: the live simulation never stops.
//!
//! Every tick, unanchored entities aboard a grid jitter slightly.  This is
//! the stand-in for the host's physics integration; it keeps mutating the
//! graph while an export is in flight, which the pipeline must tolerate.

use bevy::prelude::*;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::{DRIFT_SEED, DRIFT_STEP};
use crate::container::InsideContainer;
use crate::grid::{Anchored, GridLocal};

/// Seeded RNG for drift so headless runs and tests are reproducible.
#[derive(Resource)]
pub struct DriftRng(pub ChaCha8Rng);

impl Default for DriftRng {
    fn default() -> Self {
        Self(ChaCha8Rng::seed_from_u64(DRIFT_SEED))
    }
}

pub fn drift_loose_entities(
    mut rng: ResMut<DriftRng>,
    mut loose: Query<&mut GridLocal, (Without<Anchored>, Without<InsideContainer>)>,
) {
    for mut local in &mut loose {
        local.offset.x += rng.0.gen_range(-DRIFT_STEP..=DRIFT_STEP);
        local.offset.y += rng.0.gen_range(-DRIFT_STEP..=DRIFT_STEP);
    }
}
