//! Logical containment: entities held inside another entity's item slots.

use bevy::prelude::*;

/// Ordered contents of a container-bearing entity (a locker, a crate, a
/// console card slot).  Items listed here are logically aboard whatever grid
/// the container is aboard.
#[derive(Component, Debug, Clone, Default)]
pub struct ItemContainer {
    pub items: Vec<Entity>,
}

/// Back-pointer from a contained item to its container.
#[derive(Component, Debug, Clone, Copy)]
pub struct InsideContainer(pub Entity);

/// Place `item` inside `container`'s item slots.  The container gains an
/// [`ItemContainer`] if it does not already have one.
pub fn insert_into(world: &mut World, container: Entity, item: Entity) {
    if let Some(mut slots) = world.get_mut::<ItemContainer>(container) {
        slots.items.push(item);
    } else if let Ok(mut e) = world.get_entity_mut(container) {
        e.insert(ItemContainer { items: vec![item] });
    } else {
        return;
    }
    if let Ok(mut e) = world.get_entity_mut(item) {
        e.insert(InsideContainer(container));
    }
}

/// Whether `entity` currently sits inside any container.
pub fn is_inside_any_container(world: &World, entity: Entity) -> bool {
    world.get::<InsideContainer>(entity).is_some()
}

/// Snapshot of a container's contents, empty if the entity has no container.
pub fn container_contents(world: &World, entity: Entity) -> Vec<Entity> {
    world
        .get::<ItemContainer>(entity)
        .map(|c| c.items.clone())
        .unwrap_or_default()
}
