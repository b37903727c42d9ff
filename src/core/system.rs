//! Systems and the per-tick scheduler
//!
//! A system reads and writes entities through the store once per tick. The
//! scheduler runs systems strictly in the order they were added, so any
//! store mutation made by one system is visible to the systems after it in
//! the same tick.

use crate::core::component::{Combatant, ComponentKind, Health, Side};
use crate::core::entity::EntityStore;

/// A unit of per-tick behavior
pub trait System {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Run one tick
    fn update(&mut self, store: &mut EntityStore, delta_time: f32);
}

/// A system backed by a closure
pub struct FnSystem<F> {
    name: String,
    run: F,
}

impl<F> FnSystem<F>
where
    F: FnMut(&mut EntityStore, f32),
{
    pub fn new(name: impl Into<String>, run: F) -> Self {
        FnSystem {
            name: name.into(),
            run,
        }
    }
}

impl<F> System for FnSystem<F>
where
    F: FnMut(&mut EntityStore, f32),
{
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, store: &mut EntityStore, delta_time: f32) {
        (self.run)(store, delta_time)
    }
}

/// Ordered list of systems driven once per tick
#[derive(Default)]
pub struct SystemScheduler {
    systems: Vec<Box<dyn System>>,
}

impl SystemScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a system; execution order is insertion order
    pub fn add_system(&mut self, system: impl System + 'static) {
        self.systems.push(Box::new(system));
    }

    /// Run every system once with the same `delta_time`
    pub fn update_all_systems(&mut self, store: &mut EntityStore, delta_time: f32) {
        for system in self.systems.iter_mut() {
            system.update(store, delta_time);
        }
    }

    pub fn system_names(&self) -> impl Iterator<Item = &str> {
        self.systems.iter().map(|s| s.name())
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

impl std::fmt::Debug for SystemScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemScheduler")
            .field("systems", &self.system_names().collect::<Vec<_>>())
            .finish()
    }
}

/// Removes enemy combatants whose health has run out
///
/// Player combatants are left in place; defeat of the player is decided by
/// the battle rules, not by this system.
#[derive(Debug, Default)]
pub struct DefeatCleanupSystem {
    removed: usize,
}

impl DefeatCleanupSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total entities removed so far
    pub fn removed(&self) -> usize {
        self.removed
    }
}

impl System for DefeatCleanupSystem {
    fn name(&self) -> &str {
        "defeat_cleanup"
    }

    fn update(&mut self, store: &mut EntityStore, _delta_time: f32) {
        let defeated: Vec<_> = store
            .get_entities_with_components(&[ComponentKind::Combatant, ComponentKind::Health])
            .filter(|entity| {
                let enemy = entity
                    .get::<Combatant>()
                    .is_some_and(|c| c.side == Side::Enemy);
                let depleted = entity.get::<Health>().is_some_and(Health::is_depleted);
                enemy && depleted
            })
            .map(|entity| entity.id())
            .collect();

        for id in defeated {
            store.remove_entity(id);
            self.removed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EntityId;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn enemy(store: &mut EntityStore, hp: i32) -> EntityId {
        let entity = store.create_entity();
        entity
            .with(Combatant {
                name: "Imp".to_string(),
                side: Side::Enemy,
            })
            .with(Health { current: hp, max: 10 });
        entity.id()
    }

    #[test]
    fn test_systems_run_in_registration_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = SystemScheduler::new();
        for name in ["first", "second", "third"] {
            let order = Rc::clone(&order);
            scheduler.add_system(FnSystem::new(name, move |_store: &mut EntityStore, dt: f32| {
                order.borrow_mut().push((name, dt));
            }));
        }

        let mut store = EntityStore::new();
        scheduler.update_all_systems(&mut store, 0.5);

        assert_eq!(
            *order.borrow(),
            vec![("first", 0.5), ("second", 0.5), ("third", 0.5)]
        );
    }

    #[test]
    fn test_mutation_visible_to_later_systems() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = SystemScheduler::new();

        let before = Rc::clone(&seen);
        scheduler.add_system(FnSystem::new("count_before", move |store: &mut EntityStore, _| {
            before.borrow_mut().push(store.len());
        }));
        scheduler.add_system(DefeatCleanupSystem::new());
        let after = Rc::clone(&seen);
        scheduler.add_system(FnSystem::new("count_after", move |store: &mut EntityStore, _| {
            after.borrow_mut().push(store.len());
        }));

        let mut store = EntityStore::new();
        enemy(&mut store, 0);
        let alive = enemy(&mut store, 4);

        scheduler.update_all_systems(&mut store, 1.0);

        assert_eq!(*seen.borrow(), vec![2, 1]);
        assert!(store.contains(alive));
    }

    #[test]
    fn test_cleanup_spares_player() {
        let mut store = EntityStore::new();
        let player = store.create_entity();
        player
            .with(Combatant {
                name: "Hero".to_string(),
                side: Side::Player,
            })
            .with(Health { current: 0, max: 20 });
        let player_id = player.id();

        let mut cleanup = DefeatCleanupSystem::new();
        cleanup.update(&mut store, 1.0);

        assert!(store.contains(player_id));
        assert_eq!(cleanup.removed(), 0);
    }
}
