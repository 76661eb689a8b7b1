//! Headless demo: spawn a small ship, export it, print what happened.

use bevy::log::LogPlugin;
use bevy::prelude::*;

use gridsave::{
    ExportFinished, ExportShipRequest, GridSavePlugin, SessionId, SnapshotDelivered,
};
use simulation::battery::Battery;
use simulation::container::{insert_into, ItemContainer};
use simulation::deed::Deed;
use simulation::dispenser::Dispenser;
use simulation::grid::{Anchored, Grid, GridBounds, GridLocal, Orientation, Position};
use simulation::region::spawn_region;
use simulation::SimulationPlugin;

#[derive(Resource, Default)]
struct DemoOutcome(Option<ExportFinished>);

fn main() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(LogPlugin::default())
        .add_plugins((SimulationPlugin, GridSavePlugin))
        .init_resource::<DemoOutcome>()
        .add_systems(Update, (report_deliveries, record_outcome));

    let ship = build_demo_ship(app.world_mut());
    let card = app
        .world_mut()
        .spawn(Deed {
            ship,
            owner: "demo-captain".into(),
        })
        .id();
    app.world_mut().send_event(ExportShipRequest {
        root: ship,
        snapshot_name: "Demonstrator".into(),
        observer: SessionId::new("demo-session"),
        deed_card: Some(card),
    });

    // Step frames until the pipeline reports a terminal outcome; the ambient
    // simulation keeps running in between.
    for _ in 0..200 {
        app.update();
        if app.world().resource::<DemoOutcome>().0.is_some() {
            break;
        }
    }

    let ticks = app.world().resource::<simulation::TickCounter>().0;
    match &app.world().resource::<DemoOutcome>().0 {
        Some(finished) => info!(
            "Export '{}' finished after {ticks} ticks: {:?} ({:?})",
            finished.snapshot_name, finished.outcome, finished.counters
        ),
        None => error!("export did not finish within {ticks} ticks"),
    }
}

/// A ship with one of everything the pipeline cares about: anchored hull,
/// a stocked locker, a loose crate, a vending machine, a piloted seat, and a
/// half-drained battery.
fn build_demo_ship(world: &mut World) -> Entity {
    let space = spawn_region(world, "demo-space");
    let ship = world
        .spawn((
            Grid {
                bounds: GridBounds::from_half_extent(16.0),
            },
            Position {
                region: space,
                local: Vec2::new(25.0, 8.0),
            },
            Orientation(0.4),
        ))
        .id();

    let aboard = |world: &mut World, x: f32, y: f32| {
        world
            .spawn((
                GridLocal {
                    grid: ship,
                    offset: Vec2::new(x, y),
                },
                Anchored,
            ))
            .id()
    };

    aboard(world, 0.0, 1.0); // hull plate

    let locker = aboard(world, 2.0, 0.0);
    world.entity_mut(locker).insert(ItemContainer::default());
    let wrench = world.spawn_empty().id();
    insert_into(world, locker, wrench);

    // Loose crate, free to drift.
    world.spawn(GridLocal {
        grid: ship,
        offset: Vec2::new(4.0, -3.0),
    });

    let vendor = aboard(world, -1.0, 2.0);
    world.entity_mut(vendor).insert(Dispenser { stock: 30 });

    let seat = aboard(world, 0.0, -1.0);
    world.entity_mut(seat).insert((
        simulation::session::Controlled {
            session: "demo-session".into(),
        },
        simulation::session::Viewpoint,
    ));

    let generator = aboard(world, -3.0, 0.0);
    world
        .entity_mut(generator)
        .insert(Battery::at_charge(500.0, 210.0));

    ship
}

fn report_deliveries(mut events: EventReader<SnapshotDelivered>) {
    for delivery in events.read() {
        info!(
            "Delivered snapshot '{}' ({} bytes) to session {:?}",
            delivery.snapshot_name,
            delivery.payload.len(),
            delivery.observer
        );
    }
}

fn record_outcome(mut events: EventReader<ExportFinished>, mut outcome: ResMut<DemoOutcome>) {
    if let Some(finished) = events.read().last() {
        outcome.0 = Some(finished.clone());
    }
}
