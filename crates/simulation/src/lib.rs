use bevy::prelude::*;

pub mod atmos;
pub mod battery;
pub mod config;
pub mod container;
pub mod deed;
pub mod dispenser;
pub mod drift;
pub mod graph;
pub mod grid;
pub mod region;
pub mod session;
pub mod spatial;

// ---------------------------------------------------------------------------
// Core resources
// ---------------------------------------------------------------------------

/// Global tick counter incremented each Update, used for throttling and for
/// the tick-denominated delays in the export pipeline.
#[derive(Resource, Default)]
pub struct TickCounter(pub u64);

pub fn advance_tick(mut tick: ResMut<TickCounter>) {
    tick.0 += 1;
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

/// Host-side simulation: the live entity graph plus the ambient systems that
/// keep stepping it.  Nothing here knows about exports; the pipeline crate
/// drives the graph through the helpers in `graph`, `spatial`, and `region`.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TickCounter>()
            .init_resource::<drift::DriftRng>()
            .add_systems(Update, (advance_tick, drift::drift_loose_entities).chain());
    }
}
