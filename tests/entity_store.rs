//! Entity store and scheduler behavior through the public API

use elemental_battler::core::{
    CardStats, Combatant, Component, ComponentKind, DefeatCleanupSystem, Element, EntityId,
    EntityStore, FnSystem, Health, Selected, Side, SystemScheduler,
};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rustc_hash::FxHashSet;
use similar_asserts::assert_eq;

const KINDS: [ComponentKind; 4] = [
    ComponentKind::Element,
    ComponentKind::Stats,
    ComponentKind::Health,
    ComponentKind::Selected,
];

fn component_for(kind: ComponentKind, n: i32) -> Component {
    match kind {
        ComponentKind::Element => Component::new(Element::ALL[n as usize % 5]),
        ComponentKind::Stats => Component::new(CardStats::new(n, n)),
        ComponentKind::Health => Component::new(Health::new(n + 1)),
        _ => Component::new(Selected { order: n as u32 }),
    }
}

#[test]
fn test_ids_strictly_increase() {
    let mut store = EntityStore::new();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
    let mut last: Option<EntityId> = None;

    for _ in 0..200 {
        let id = store.create_entity().id();
        if let Some(previous) = last {
            assert!(id > previous);
        }
        last = Some(id);
        if rng.gen_bool(0.3) {
            store.remove_entity(id);
        }
    }
}

#[test]
fn test_filter_matches_brute_force() {
    let mut store = EntityStore::new();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(99);
    for n in 0..100 {
        let entity = store.create_entity();
        for kind in KINDS {
            if rng.gen_bool(0.5) {
                entity.add_component(component_for(kind, n));
            }
        }
    }

    let queries: [&[ComponentKind]; 5] = [
        &[ComponentKind::Element],
        &[ComponentKind::Element, ComponentKind::Stats],
        &[ComponentKind::Stats, ComponentKind::Element],
        &[ComponentKind::Health, ComponentKind::Stats, ComponentKind::Selected],
        &KINDS,
    ];
    for kinds in queries {
        let expected: FxHashSet<EntityId> = store
            .get_all_entities()
            .filter(|e| kinds.iter().all(|k| e.get_component(*k).is_some()))
            .map(|e| e.id())
            .collect();
        let actual: FxHashSet<EntityId> = store
            .get_entities_with_components(kinds)
            .map(|e| e.id())
            .collect();
        assert_eq!(actual, expected, "{kinds:?}");
    }

    // Kind order does not matter
    assert_eq!(
        store.ids_with_components(&[ComponentKind::Element, ComponentKind::Stats]),
        store.ids_with_components(&[ComponentKind::Stats, ComponentKind::Element])
    );
    // Combatant was never attached
    assert!(store.ids_with_components(&[ComponentKind::Combatant]).is_empty());
}

#[test]
fn test_replaced_component_is_unreachable() {
    let mut store = EntityStore::new();
    let id = store.create_entity().id();
    let entity = store.get_entity_mut(id).unwrap();

    entity.add_component(Component::new(CardStats::new(1, 1)));
    let old = entity.add_component(Component::new(CardStats::new(9, 9))).unwrap();

    assert_eq!(old.owner(), None);
    assert_eq!(entity.get::<CardStats>(), Some(&CardStats::new(9, 9)));
    assert_eq!(entity.components().count(), 1);
}

#[test]
fn test_remove_twice_equals_remove_once() {
    let build = || {
        let mut store = EntityStore::new();
        for _ in 0..5 {
            store.create_entity().with(Element::Water);
        }
        store
    };

    let mut once = build();
    once.remove_entity(EntityId::new(2));
    let mut twice = build();
    twice.remove_entity(EntityId::new(2));
    twice.remove_entity(EntityId::new(2));

    let ids = |store: &EntityStore| store.ids_with_components(&[]);
    assert_eq!(ids(&once), ids(&twice));
    assert_eq!(ids(&once).len(), 4);
}

#[test]
fn test_scheduler_tick_with_damage_and_cleanup() {
    let mut store = EntityStore::new();
    let mut enemies = Vec::new();
    for hp in [1, 2, 3] {
        let enemy = store.create_entity();
        enemy
            .with(Combatant {
                name: format!("Imp {hp}"),
                side: Side::Enemy,
            })
            .with(Health { current: hp, max: 3 });
        enemies.push(enemy.id());
    }

    let mut scheduler = SystemScheduler::new();
    scheduler.add_system(FnSystem::new("burn", |store: &mut EntityStore, _dt: f32| {
        for id in store.ids_with_components(&[ComponentKind::Health]) {
            if let Some(health) = store.get_entity_mut(id).and_then(|e| e.get_mut::<Health>()) {
                health.current -= 1;
            }
        }
    }));
    scheduler.add_system(DefeatCleanupSystem::new());
    assert_eq!(scheduler.system_names().collect::<Vec<_>>(), vec!["burn", "defeat_cleanup"]);

    scheduler.update_all_systems(&mut store, 0.016);
    assert_eq!(store.len(), 2);
    assert!(!store.contains(enemies[0]));

    scheduler.update_all_systems(&mut store, 0.016);
    scheduler.update_all_systems(&mut store, 0.016);
    assert!(store.is_empty());
}
