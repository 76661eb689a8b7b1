//! World-model constants shared across the simulation crate.

/// Default half-extent (in world units) of a freshly built ship hull.
/// Entities whose offset falls outside the hull bounds are not considered
/// aboard, even if they reference the grid.
pub const DEFAULT_HULL_HALF_EXTENT: f32 = 32.0;

/// Maximum per-tick positional jitter applied to unanchored aboard entities
/// by the ambient drift system.
pub const DRIFT_STEP: f32 = 0.05;

/// Seed for the drift RNG.  Fixed so headless runs are reproducible.
pub const DRIFT_SEED: u64 = 0x5A17_C0DE;
