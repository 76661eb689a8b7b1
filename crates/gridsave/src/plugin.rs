//! Plugin wiring: events, resources, and the per-tick system chain.

use bevy::prelude::*;

use simulation::deed::Deed;
use simulation::grid::Grid;

use crate::config::ExportConfig;
use crate::delivery::{ExportCompleted, SnapshotDelivered};
use crate::error::ExportStage;
use crate::outcome::{ExportCounters, ExportFinished, ExportOutcome};
use crate::pipeline::{drive_export_jobs, ExportJob, InFlightExports};
use crate::request::ExportShipRequest;

pub struct GridSavePlugin;

impl Plugin for GridSavePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ExportShipRequest>()
            .add_event::<SnapshotDelivered>()
            .add_event::<ExportCompleted>()
            .add_event::<ExportFinished>()
            .init_resource::<ExportConfig>()
            .init_resource::<InFlightExports>()
            .add_systems(
                Update,
                (
                    intake_export_requests,
                    drive_export_jobs,
                    revoke_deeds_on_completed,
                )
                    .chain(),
            );
    }
}

/// Reject a request at intake without spawning a job.  Reported through the
/// same [`ExportFinished`] channel as a run that failed later.
fn reject(
    finished: &mut EventWriter<ExportFinished>,
    request: &ExportShipRequest,
    reason: &str,
) {
    warn!("Rejected export '{}': {reason}", request.snapshot_name);
    finished.send(ExportFinished {
        root: request.root,
        snapshot_name: request.snapshot_name.clone(),
        outcome: ExportOutcome::Failed {
            stage: ExportStage::Isolate,
            reason: reason.to_string(),
        },
        counters: ExportCounters::default(),
    });
}

/// Validate incoming requests and spawn a job per accepted one.
///
/// When a deed card is presented it must carry a deed for the requested grid;
/// a missing or mismatched deed means the requester has no claim to export
/// this ship.
fn intake_export_requests(
    mut commands: Commands,
    mut requests: EventReader<ExportShipRequest>,
    mut finished: EventWriter<ExportFinished>,
    mut in_flight: ResMut<InFlightExports>,
    config: Res<ExportConfig>,
    grids: Query<&Grid>,
    deeds: Query<&Deed>,
) {
    for request in requests.read() {
        if grids.get(request.root).is_err() {
            reject(&mut finished, request, "root is not a live grid");
            continue;
        }

        let mut owner = None;
        if let Some(card) = request.deed_card {
            match deeds.get(card) {
                Ok(deed) if deed.ship == request.root => owner = Some(deed.owner.clone()),
                Ok(_) => {
                    reject(&mut finished, request, "deed card is for a different ship");
                    continue;
                }
                Err(_) => {
                    reject(&mut finished, request, "presented card carries no deed");
                    continue;
                }
            }
        }

        if !in_flight.0.insert(request.root) {
            reject(&mut finished, request, "an export for this grid is already in flight");
            continue;
        }

        info!(
            "Accepted export '{}' of grid {} for {:?}",
            request.snapshot_name, request.root, request.observer
        );
        commands.spawn(ExportJob::new(
            request.root,
            request.snapshot_name.clone(),
            request.observer.clone(),
            owner,
            config.clone(),
        ));
    }
}

/// After the completion notification, every deed pointing at the exported
/// grid is void, not just the one presented with the request.
fn revoke_deeds_on_completed(
    mut commands: Commands,
    mut completed: EventReader<ExportCompleted>,
    deeds: Query<(Entity, &Deed)>,
) {
    for event in completed.read() {
        for (card, deed) in &deeds {
            if deed.ship != event.root {
                continue;
            }
            if let Some(mut entry) = commands.get_entity(card) {
                entry.remove::<Deed>();
                info!(
                    "Revoked deed held by '{}' for exported ship {}",
                    deed.owner, event.root
                );
            }
        }
    }
}
