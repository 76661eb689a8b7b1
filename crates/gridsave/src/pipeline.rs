//! The export pipeline: a per-run state machine driven one phase per tick.
//!
//! Each accepted request spawns an [`ExportJob`] entity.  The driver system
//! advances every job by at most one phase per `Update`, so the ambient
//! simulation keeps stepping between stages — membership is recomputed fresh
//! each stage and entity existence is re-validated before every mutation.
//!
//! Error handling is forward-only: a stage failure skips the remaining stages
//! and jumps straight to cleanup.  There is no rollback; a failed export may
//! leave the root already relocated and mutated, and cleanup deletes it
//! unconditionally either way.  Cleanup failures are logged, never escalated,
//! and never reverse the recorded outcome.

use bevy::prelude::*;
use std::collections::HashSet;
use std::path::PathBuf;

use simulation::graph::{delete_entity, entity_exists, relocate_grid};
use simulation::grid::Grid;
use simulation::spatial::grid_subgraph;

use crate::codec;
use crate::config::ExportConfig;
use crate::delivery::{ExportCompleted, SnapshotDelivered};
use crate::error::{ExportError, ExportStage};
use crate::outcome::{ExportCounters, ExportFinished, ExportOutcome};
use crate::purge;
use crate::request::SessionId;
use crate::retry::{RetryState, RetryVerdict};
use crate::sanitize;
use crate::scratch::{self, ScratchRegion};

/// Roots with an export currently in flight.  A second request for the same
/// root is rejected at intake instead of racing the first run's scratch
/// region and deletions.
#[derive(Resource, Default)]
pub struct InFlightExports(pub HashSet<Entity>);

#[derive(Debug)]
enum JobPhase {
    Isolate,
    PurgeContents,
    PurgeStructure,
    Serialize,
    /// Bounded-retry deletion of the scratch file.  Non-fatal: giving up is
    /// logged and the run proceeds.
    ScrubScratchFile,
    Finalize,
    /// Cleanup: let dependent systems react before the region disappears.
    RegionGrace { ticks_left: u32 },
    /// Cleanup: shorter wait before force-deleting a still-live root.
    RootGrace { ticks_left: u32 },
}

/// State for one export run.  Lives on its own entity; the driver takes it
/// out, advances it against the full world, and puts it back (or despawns the
/// job when the run is over).
#[derive(Component)]
pub struct ExportJob {
    root: Entity,
    snapshot_name: String,
    observer: SessionId,
    owner: Option<String>,
    config: ExportConfig,
    phase: JobPhase,
    counters: ExportCounters,
    failure: Option<(ExportStage, String)>,
    scratch: Option<ScratchRegion>,
    scratch_file: Option<PathBuf>,
    payload_bytes: usize,
    retry: Option<RetryState>,
}

impl ExportJob {
    pub(crate) fn new(
        root: Entity,
        snapshot_name: String,
        observer: SessionId,
        owner: Option<String>,
        config: ExportConfig,
    ) -> Self {
        Self {
            root,
            snapshot_name,
            observer,
            owner,
            config,
            phase: JobPhase::Isolate,
            counters: ExportCounters::default(),
            failure: None,
            scratch: None,
            scratch_file: None,
            payload_bytes: 0,
            retry: None,
        }
    }

    /// Record a stage failure and divert to cleanup.  Remaining stages are
    /// skipped; nothing already done is rolled back.
    fn fail(&mut self, stage: ExportStage, error: ExportError) {
        error!(
            "Export '{}' failed during {stage}: {error}",
            self.snapshot_name
        );
        self.failure = Some((stage, error.to_string()));
        self.phase = JobPhase::RegionGrace {
            ticks_left: self.config.region_grace_ticks,
        };
    }

    /// Advance by at most one phase.  Returns `true` when the job is done
    /// and its entity can be despawned.
    fn step(&mut self, world: &mut World) -> bool {
        match self.phase {
            JobPhase::Isolate => {
                match self.isolate(world) {
                    Ok(()) => self.phase = JobPhase::PurgeContents,
                    Err(e) => self.fail(ExportStage::Isolate, e),
                }
                false
            }
            JobPhase::PurgeContents => {
                purge::purge_contents(world, self.root, &mut self.counters);
                self.phase = JobPhase::PurgeStructure;
                false
            }
            JobPhase::PurgeStructure => {
                self.purge_structure(world);
                self.phase = JobPhase::Serialize;
                false
            }
            JobPhase::Serialize => {
                match self.serialize(world) {
                    Ok(()) => self.phase = JobPhase::ScrubScratchFile,
                    Err(e) => self.fail(ExportStage::Serialize, e),
                }
                false
            }
            JobPhase::ScrubScratchFile => {
                self.scrub_scratch_file();
                false
            }
            JobPhase::Finalize => {
                self.finalize(world);
                false
            }
            JobPhase::RegionGrace { ticks_left } => {
                if ticks_left > 0 {
                    self.phase = JobPhase::RegionGrace {
                        ticks_left: ticks_left - 1,
                    };
                } else {
                    if let Some(handle) = self.scratch.take() {
                        scratch::release(world, handle);
                    }
                    self.phase = JobPhase::RootGrace {
                        ticks_left: self.config.root_grace_ticks,
                    };
                }
                false
            }
            JobPhase::RootGrace { ticks_left } => {
                if ticks_left > 0 {
                    self.phase = JobPhase::RootGrace {
                        ticks_left: ticks_left - 1,
                    };
                    return false;
                }
                self.cleanup_and_report(world);
                true
            }
        }
    }

    /// Stage 1: scratch region, relocation, rotation normalization.
    fn isolate(&mut self, world: &mut World) -> Result<(), ExportError> {
        let handle = scratch::acquire(world, &self.snapshot_name);
        self.scratch = Some(handle);

        if !entity_exists(world, self.root) {
            return Err(ExportError::RootVanished);
        }
        if world.get::<Grid>(self.root).is_none() {
            return Err(ExportError::NotAGrid);
        }
        relocate_grid(world, self.root, handle.region, Vec2::ZERO);
        info!(
            "Export '{}': relocated grid {} into scratch region {}",
            self.snapshot_name, self.root, handle.region
        );
        Ok(())
    }

    /// Stage 3: hard-delete rules plus component-level sanitization, over a
    /// freshly recomputed membership.
    fn purge_structure(&mut self, world: &mut World) {
        let members = grid_subgraph(world, self.root);
        for entity in members {
            sanitize::apply_rules(world, entity, sanitize::default_rules(), &mut self.counters);
        }
        info!(
            "Export '{}': structure purge done ({} removed, {} stripped, {} reset)",
            self.snapshot_name,
            self.counters.entities_removed,
            self.counters.components_stripped,
            self.counters.components_reset
        );
    }

    /// Stage 4: serialize to the scratch file, read back, hand the payload to
    /// the delivery channel, and arm the retry for scratch-file deletion.
    fn serialize(&mut self, world: &mut World) -> Result<(), ExportError> {
        let snapshot = codec::collect_snapshot(world, self.root, &self.snapshot_name)?;
        let bytes = codec::encode_snapshot(&snapshot);

        let path = self.config.scratch_file(&self.snapshot_name);
        self.scratch_file = Some(path.clone());
        codec::write_snapshot_file(&path, &bytes)?;

        let payload = codec::read_snapshot_file(&path)?;
        self.payload_bytes = payload.len();
        world.send_event(SnapshotDelivered {
            observer: self.observer.clone(),
            snapshot_name: self.snapshot_name.clone(),
            payload,
        });
        info!(
            "Export '{}': serialized {} entities, delivered {} bytes to {:?}",
            self.snapshot_name,
            snapshot.entities.len(),
            self.payload_bytes,
            self.observer
        );

        self.retry = Some(RetryState::new(
            self.config.delete_retry_attempts,
            self.config.delete_retry_first_delay_ticks,
        ));
        Ok(())
    }

    /// Delete the scratch file with bounded exponential backoff.  Transient
    /// contention is expected; giving up is a warning, not a failure.
    fn scrub_scratch_file(&mut self) {
        let Some(path) = self.scratch_file.clone() else {
            self.phase = JobPhase::Finalize;
            return;
        };
        let Some(retry) = self.retry.as_mut() else {
            self.phase = JobPhase::Finalize;
            return;
        };
        if !retry.tick() {
            return;
        }
        match codec::delete_snapshot_file(&path) {
            Ok(()) => {
                self.scratch_file = None;
                self.phase = JobPhase::Finalize;
            }
            Err(e) => match retry.on_failure() {
                RetryVerdict::RetryAfterBackoff => {
                    warn!("Scratch file delete failed, backing off: {e}");
                }
                RetryVerdict::GiveUp => {
                    warn!(
                        "Giving up deleting scratch file {}: {e}",
                        path.display()
                    );
                    self.phase = JobPhase::Finalize;
                }
            },
        }
    }

    /// Stage 5: completion notification, then delete the relocated root.
    /// Deed revocation happens in the observer of [`ExportCompleted`].
    fn finalize(&mut self, world: &mut World) {
        world.send_event(ExportCompleted {
            root: self.root,
            snapshot_name: self.snapshot_name.clone(),
            owner: self.owner.clone(),
            observer: self.observer.clone(),
        });
        if entity_exists(world, self.root) {
            delete_entity(world, self.root);
            info!("Export '{}': deleted root grid {}", self.snapshot_name, self.root);
        }
        self.phase = JobPhase::RegionGrace {
            ticks_left: self.config.region_grace_ticks,
        };
    }

    /// Final cleanup step: force-delete a still-live root, best-effort remove
    /// any leftover scratch file, report the outcome exactly once.
    fn cleanup_and_report(&mut self, world: &mut World) {
        if entity_exists(world, self.root) {
            delete_entity(world, self.root);
            info!(
                "Export '{}': cleanup deleted root grid {}",
                self.snapshot_name, self.root
            );
        }
        if let Some(path) = self.scratch_file.take() {
            if let Err(e) = codec::delete_snapshot_file(&path) {
                warn!(
                    "Cleanup could not delete scratch file {}: {e}",
                    path.display()
                );
            }
        }

        let outcome = match self.failure.take() {
            Some((stage, reason)) => ExportOutcome::Failed { stage, reason },
            None => ExportOutcome::Success {
                payload_bytes: self.payload_bytes,
            },
        };
        world.send_event(ExportFinished {
            root: self.root,
            snapshot_name: self.snapshot_name.clone(),
            outcome,
            counters: self.counters,
        });
        world
            .resource_mut::<InFlightExports>()
            .0
            .remove(&self.root);
    }
}

/// Driver: advance every live job by one phase.  Jobs are taken out of the
/// world while they step so they can mutate it freely.
pub(crate) fn drive_export_jobs(world: &mut World) {
    let jobs: Vec<Entity> = {
        let mut q = world.query_filtered::<Entity, With<ExportJob>>();
        q.iter(world).collect()
    };

    for job_entity in jobs {
        let Ok(mut entry) = world.get_entity_mut(job_entity) else {
            continue;
        };
        let Some(mut job) = entry.take::<ExportJob>() else {
            continue;
        };

        let done = job.step(world);

        if done {
            world.despawn(job_entity);
        } else if let Ok(mut entry) = world.get_entity_mut(job_entity) {
            entry.insert(job);
        }
    }
}
