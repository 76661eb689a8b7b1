//! # TestShipyard — headless integration harness for the export pipeline.
//!
//! Wraps `bevy::app::App` + `SimulationPlugin` + `GridSavePlugin` for running
//! full export runs without a window or network.  Set up a ship with the
//! builder-ish helpers, fire a request, then `run_until_finished()` and
//! assert on the resulting ECS state and captured events.

use bevy::app::App;
use bevy::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use simulation::container::insert_into;
use simulation::deed::Deed;
use simulation::grid::{Anchored, Grid, GridBounds, GridLocal, Orientation, Position};
use simulation::region::spawn_region;
use simulation::SimulationPlugin;

use crate::config::ExportConfig;
use crate::delivery::SnapshotDelivered;
use crate::outcome::ExportFinished;
use crate::plugin::GridSavePlugin;
use crate::request::{ExportShipRequest, SessionId};

/// Everything the delivery channel handed out, in order.
#[derive(Resource, Default)]
pub struct CapturedDeliveries(pub Vec<SnapshotDelivered>);

/// Every terminal outcome, in order.
#[derive(Resource, Default)]
pub struct CapturedFinishes(pub Vec<ExportFinished>);

fn capture_deliveries(
    mut events: EventReader<SnapshotDelivered>,
    mut captured: ResMut<CapturedDeliveries>,
) {
    for event in events.read() {
        captured.0.push(event.clone());
    }
}

fn capture_finishes(
    mut events: EventReader<ExportFinished>,
    mut captured: ResMut<CapturedFinishes>,
) {
    for event in events.read() {
        captured.0.push(event.clone());
    }
}

// Each harness gets its own scratch directory so parallel tests never share
// files.
static HARNESS_COUNTER: AtomicU64 = AtomicU64::new(0);

pub struct TestShipyard {
    app: App,
    /// The "open space" region ships start in.
    pub space: Entity,
    scratch_dir: PathBuf,
}

impl TestShipyard {
    pub fn new() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(SimulationPlugin);
        app.add_plugins(GridSavePlugin);

        let serial = HARNESS_COUNTER.fetch_add(1, Ordering::Relaxed);
        let scratch_dir = std::env::temp_dir().join(format!(
            "gridsave_test_{}_{serial}",
            std::process::id()
        ));
        // Short grace delays keep the per-test tick counts small.
        app.insert_resource(ExportConfig {
            scratch_dir: scratch_dir.clone(),
            region_grace_ticks: 2,
            root_grace_ticks: 1,
            delete_retry_attempts: 3,
            delete_retry_first_delay_ticks: 1,
        });
        app.init_resource::<CapturedDeliveries>();
        app.init_resource::<CapturedFinishes>();
        app.add_systems(Update, (capture_deliveries, capture_finishes));

        let space = spawn_region(app.world_mut(), "space");
        app.update();

        Self {
            app,
            space,
            scratch_dir,
        }
    }

    // -----------------------------------------------------------------------
    // World setup
    // -----------------------------------------------------------------------

    /// Spawn a grid root in open space, deliberately off-origin and rotated so
    /// tests exercise the relocation and rotation normalization.
    pub fn spawn_ship(&mut self) -> Entity {
        self.app
            .world_mut()
            .spawn((
                Grid {
                    bounds: GridBounds::from_half_extent(16.0),
                },
                Position {
                    region: self.space,
                    local: Vec2::new(40.0, -12.0),
                },
                Orientation(0.35),
            ))
            .id()
    }

    /// Spawn an entity aboard `ship` at the given grid-local offset.
    pub fn spawn_aboard(&mut self, ship: Entity, x: f32, y: f32) -> Entity {
        self.app
            .world_mut()
            .spawn(GridLocal {
                grid: ship,
                offset: Vec2::new(x, y),
            })
            .id()
    }

    /// Spawn an anchored entity aboard `ship`.
    pub fn spawn_anchored(&mut self, ship: Entity, x: f32, y: f32) -> Entity {
        let entity = self.spawn_aboard(ship, x, y);
        self.app.world_mut().entity_mut(entity).insert(Anchored);
        entity
    }

    pub fn insert_on<B: Bundle>(&mut self, entity: Entity, bundle: B) {
        self.app.world_mut().entity_mut(entity).insert(bundle);
    }

    /// Put `item` inside `container` (spawning the container component as
    /// needed is the caller's job).
    pub fn put_inside(&mut self, container: Entity, item: Entity) {
        insert_into(self.app.world_mut(), container, item);
    }

    /// Spawn a card entity holding a deed for `ship`.
    pub fn spawn_deed_card(&mut self, ship: Entity, owner: &str) -> Entity {
        self.app
            .world_mut()
            .spawn(Deed {
                ship,
                owner: owner.to_string(),
            })
            .id()
    }

    pub fn despawn(&mut self, entity: Entity) {
        self.app.world_mut().despawn(entity);
    }

    // -----------------------------------------------------------------------
    // Driving the pipeline
    // -----------------------------------------------------------------------

    pub fn request_export(
        &mut self,
        root: Entity,
        name: &str,
        observer: &str,
        deed_card: Option<Entity>,
    ) {
        self.app.world_mut().send_event(ExportShipRequest {
            root,
            snapshot_name: name.to_string(),
            observer: SessionId::new(observer),
            deed_card,
        });
    }

    /// Advance the simulation and pipeline by one tick.
    pub fn tick(&mut self) {
        self.app.update();
    }

    /// Tick until an [`ExportFinished`] for `name` shows up.  Panics if the
    /// export does not terminate within a generous bound.
    pub fn run_until_finished(&mut self, name: &str) -> ExportFinished {
        for _ in 0..200 {
            self.app.update();
            let finishes = self.app.world().resource::<CapturedFinishes>();
            if let Some(finished) = finishes.0.iter().find(|f| f.snapshot_name == name) {
                return finished.clone();
            }
        }
        panic!("export '{name}' did not finish within 200 ticks");
    }

    // -----------------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------------

    pub fn world(&self) -> &World {
        self.app.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn entity_exists(&self, entity: Entity) -> bool {
        self.app.world().get_entity(entity).is_ok()
    }

    pub fn deliveries(&self) -> Vec<SnapshotDelivered> {
        self.app.world().resource::<CapturedDeliveries>().0.clone()
    }

    pub fn finishes(&self) -> Vec<ExportFinished> {
        self.app.world().resource::<CapturedFinishes>().0.clone()
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    pub fn scratch_file(&self, name: &str) -> PathBuf {
        self.app
            .world()
            .resource::<ExportConfig>()
            .scratch_file(name)
    }
}

impl Drop for TestShipyard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.scratch_dir);
    }
}
