//! Declarative sanitization rules.
//!
//! Each rule pairs a predicate over an entity with an effect: delete the
//! entity, strip one component, or reset one component to its canonical
//! value.  A single interpreter evaluates the fixed rule set against each
//! remaining subgraph member, so policy stays data, not scattered branches,
//! and every rule is independently testable.
//!
//! Rules never read sibling state; applying them is order-independent across
//! entities and idempotent per entity.

use bevy::prelude::*;

use simulation::atmos::GasExchanger;
use simulation::battery::Battery;
use simulation::dispenser::Dispenser;
use simulation::graph::{delete_entity, entity_exists};
use simulation::session::{Controlled, Viewpoint};

use crate::outcome::ExportCounters;

/// Effect half of a rule.  Strip/Reset carry type-erased component ops that
/// report whether they changed anything, so counters stay accurate and a
/// second pass over a clean entity counts nothing.
pub enum RuleEffect {
    /// Remove the entity (and its dependents) entirely.
    Delete,
    /// Remove one component; returns whether it was present.
    Strip(fn(&mut World, Entity) -> bool),
    /// Reset one component in place; returns whether it changed.
    Reset(fn(&mut World, Entity) -> bool),
}

pub struct SanitizeRule {
    /// Stable name, used in logs.
    pub name: &'static str,
    pub applies: fn(&World, Entity) -> bool,
    pub effect: RuleEffect,
}

fn has_component<T: Component>(world: &World, entity: Entity) -> bool {
    world.get::<T>(entity).is_some()
}

fn strip_component<T: Component>(world: &mut World, entity: Entity) -> bool {
    world
        .get_entity_mut(entity)
        .ok()
        .and_then(|mut e| e.take::<T>())
        .is_some()
}

fn reset_battery(world: &mut World, entity: Entity) -> bool {
    let Some(mut battery) = world.get_mut::<Battery>(entity) else {
        return false;
    };
    if battery.is_full() {
        return false;
    }
    battery.charge = battery.max_charge;
    true
}

/// Fixed sanitization policy, applied in order per entity:
///
/// - dispensers are fundamentally incompatible with reload: hard-delete;
/// - controller and viewpoint bindings are session artifacts: strip;
/// - in-flight gas exchange is mid-simulation process state: strip;
/// - batteries must stay (the power net needs them) but their runtime charge
///   is not meaningful to persist: reset to full.
static DEFAULT_RULES: [SanitizeRule; 5] = [
    SanitizeRule {
        name: "delete-dispensers",
        applies: has_component::<Dispenser>,
        effect: RuleEffect::Delete,
    },
    SanitizeRule {
        name: "strip-controller-binding",
        applies: has_component::<Controlled>,
        effect: RuleEffect::Strip(strip_component::<Controlled>),
    },
    SanitizeRule {
        name: "strip-viewpoint",
        applies: has_component::<Viewpoint>,
        effect: RuleEffect::Strip(strip_component::<Viewpoint>),
    },
    SanitizeRule {
        name: "strip-gas-exchange",
        applies: has_component::<GasExchanger>,
        effect: RuleEffect::Strip(strip_component::<GasExchanger>),
    },
    SanitizeRule {
        name: "reset-battery-charge",
        applies: has_component::<Battery>,
        effect: RuleEffect::Reset(reset_battery),
    },
];

pub fn default_rules() -> &'static [SanitizeRule] {
    &DEFAULT_RULES
}

/// Run `rules` against one entity.  Existence is re-checked before every
/// mutation; an entity deleted out from under us mid-pass is expected and
/// simply ends the pass.
pub fn apply_rules(
    world: &mut World,
    entity: Entity,
    rules: &[SanitizeRule],
    counters: &mut ExportCounters,
) {
    for rule in rules {
        if !entity_exists(world, entity) {
            return;
        }
        if !(rule.applies)(world, entity) {
            continue;
        }
        match rule.effect {
            RuleEffect::Delete => {
                delete_entity(world, entity);
                counters.entities_removed += 1;
                return;
            }
            RuleEffect::Strip(strip) => {
                if strip(world, entity) {
                    counters.components_stripped += 1;
                }
            }
            RuleEffect::Reset(reset) => {
                if reset(world, entity) {
                    counters.components_reset += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispenser_is_hard_deleted() {
        let mut world = World::new();
        let vendor = world.spawn(Dispenser { stock: 7 }).id();
        let mut counters = ExportCounters::default();

        apply_rules(&mut world, vendor, default_rules(), &mut counters);

        assert!(world.get_entity(vendor).is_err());
        assert_eq!(counters.entities_removed, 1);
    }

    #[test]
    fn test_session_components_stripped_battery_reset() {
        let mut world = World::new();
        let seat = world
            .spawn((
                Controlled {
                    session: "pilot-1".into(),
                },
                Viewpoint,
                Battery::at_charge(100.0, 40.0),
            ))
            .id();
        let mut counters = ExportCounters::default();

        apply_rules(&mut world, seat, default_rules(), &mut counters);

        assert!(world.get::<Controlled>(seat).is_none());
        assert!(world.get::<Viewpoint>(seat).is_none());
        assert!(world.get::<Battery>(seat).unwrap().is_full());
        assert_eq!(counters.components_stripped, 2);
        assert_eq!(counters.components_reset, 1);
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let mut world = World::new();
        let device = world
            .spawn((
                GasExchanger {
                    pressure_delta: 3.5,
                },
                Battery::at_charge(50.0, 10.0),
            ))
            .id();

        let mut first = ExportCounters::default();
        apply_rules(&mut world, device, default_rules(), &mut first);
        assert_eq!(first.components_stripped, 1);
        assert_eq!(first.components_reset, 1);

        let mut second = ExportCounters::default();
        apply_rules(&mut world, device, default_rules(), &mut second);
        assert_eq!(second, ExportCounters::default());
    }

    #[test]
    fn test_dead_entity_is_skipped() {
        let mut world = World::new();
        let gone = world.spawn(Dispenser::default()).id();
        world.despawn(gone);
        let mut counters = ExportCounters::default();

        apply_rules(&mut world, gone, default_rules(), &mut counters);
        assert_eq!(counters, ExportCounters::default());
    }
}
