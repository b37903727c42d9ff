//! Entity system with simple integer IDs

use crate::core::component::{Component, ComponentData, ComponentKind, ComponentValue};
use crate::{BattleError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Simple integer ID for entities
///
/// IDs are handed out in increasing order starting at 0 and are never reused
/// by the store that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    pub const fn new(id: u32) -> Self {
        EntityId(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An identity plus at most one component per kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    components: FxHashMap<ComponentKind, Component>,
}

impl Entity {
    fn new(id: EntityId) -> Self {
        Entity {
            id,
            components: FxHashMap::default(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Attach a component, replacing any existing one of the same kind
    ///
    /// The replaced component is returned detached.
    pub fn add_component(&mut self, mut component: Component) -> Option<Component> {
        component.attach(self.id);
        let mut previous = self.components.insert(component.kind(), component)?;
        previous.detach();
        Some(previous)
    }

    /// Convenience for `add_component(Component::new(value))`
    pub fn with(&mut self, value: impl Into<ComponentValue>) -> &mut Self {
        self.add_component(Component::new(value));
        self
    }

    pub fn get_component(&self, kind: ComponentKind) -> Option<&Component> {
        self.components.get(&kind)
    }

    pub fn get_component_mut(&mut self, kind: ComponentKind) -> Option<&mut Component> {
        self.components.get_mut(&kind)
    }

    pub fn has_component(&self, kind: ComponentKind) -> bool {
        self.components.contains_key(&kind)
    }

    /// Detach and return the component of `kind`, if present
    pub fn remove_component(&mut self, kind: ComponentKind) -> Option<Component> {
        let mut removed = self.components.remove(&kind)?;
        removed.detach();
        Some(removed)
    }

    /// Typed read access
    pub fn get<T: ComponentData>(&self) -> Option<&T> {
        self.get_component(T::KIND).and_then(|c| T::from_value(c.value()))
    }

    /// Typed write access
    pub fn get_mut<T: ComponentData>(&mut self) -> Option<&mut T> {
        self.get_component_mut(T::KIND)
            .and_then(|c| T::from_value_mut(c.value_mut()))
    }

    /// Iterate over attached components (order unspecified)
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }
}

/// Exclusive owner of all live entities
///
/// Uses FxHashMap for fast hashing of integer keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityStore {
    entities: FxHashMap<EntityId, Entity>,
    next_id: u32,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next ID and register an entity with no components
    pub fn create_entity(&mut self) -> &mut Entity {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        self.entities.entry(id).or_insert_with(|| Entity::new(id))
    }

    pub fn get_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Lookup that reports absence as an error, for `?` propagation
    pub fn require(&self, id: EntityId) -> Result<&Entity> {
        self.entities.get(&id).ok_or(BattleError::EntityNotFound(id))
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Iterate over every live entity
    ///
    /// Order is unspecified but stable for one pass. Call again to restart.
    pub fn get_all_entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Entities holding a component of every kind in `kinds`
    ///
    /// An empty `kinds` slice matches every entity.
    pub fn get_entities_with_components<'a>(
        &'a self,
        kinds: &'a [ComponentKind],
    ) -> impl Iterator<Item = &'a Entity> + 'a {
        self.entities
            .values()
            .filter(move |entity| kinds.iter().all(|kind| entity.has_component(*kind)))
    }

    /// IDs of entities matching `kinds`, sorted ascending
    ///
    /// Useful when the caller needs to mutate the matches afterwards.
    pub fn ids_with_components(&self, kinds: &[ComponentKind]) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self
            .get_entities_with_components(kinds)
            .map(Entity::id)
            .collect();
        ids.sort();
        ids
    }

    /// Remove an entity; removing an absent ID is a no-op
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardStats, Element, Health};

    #[test]
    fn test_entity_store() {
        let mut store = EntityStore::new();
        let id1 = store.create_entity().id();
        let id2 = store.create_entity().id();

        assert_eq!(id1.as_u32(), 0);
        assert_eq!(id2.as_u32(), 1);
        assert_eq!(store.len(), 2);
        assert!(store.get_entity(id1).is_some());
        assert!(store.get_entity(EntityId::new(999)).is_none());
        assert!(matches!(
            store.require(EntityId::new(999)),
            Err(BattleError::EntityNotFound(_))
        ));
    }

    #[test]
    fn test_ids_not_reused_after_removal() {
        let mut store = EntityStore::new();
        let first = store.create_entity().id();
        store.remove_entity(first);
        let second = store.create_entity().id();
        assert!(second > first);
    }

    #[test]
    fn test_add_and_get_component() {
        let mut store = EntityStore::new();
        let entity = store.create_entity();
        let id = entity.id();
        entity.add_component(Component::new(CardStats::new(3, 2)));

        let component = entity.get_component(ComponentKind::Stats).unwrap();
        assert_eq!(component.owner(), Some(id));
        assert_eq!(entity.get::<CardStats>(), Some(&CardStats::new(3, 2)));
        assert!(entity.has_component(ComponentKind::Stats));
        assert!(!entity.has_component(ComponentKind::Element));
        assert!(entity.get::<Health>().is_none());
    }

    #[test]
    fn test_replace_component_detaches_previous() {
        let mut store = EntityStore::new();
        let entity = store.create_entity();

        assert!(entity.add_component(Component::new(Element::Fire)).is_none());
        let previous = entity.add_component(Component::new(Element::Water)).unwrap();

        assert_eq!(previous.owner(), None);
        assert_eq!(previous.value(), &ComponentValue::Element(Element::Fire));
        assert_eq!(entity.get::<Element>(), Some(&Element::Water));
        assert_eq!(entity.component_count(), 1);
    }

    #[test]
    fn test_remove_component_is_idempotent() {
        let mut store = EntityStore::new();
        let entity = store.create_entity();
        entity.with(Health::new(5));

        let removed = entity.remove_component(ComponentKind::Health).unwrap();
        assert_eq!(removed.owner(), None);
        assert!(entity.remove_component(ComponentKind::Health).is_none());
        assert!(!entity.has_component(ComponentKind::Health));
    }

    #[test]
    fn test_typed_mutation() {
        let mut store = EntityStore::new();
        let entity = store.create_entity();
        entity.with(Health::new(10));

        entity.get_mut::<Health>().unwrap().current -= 4;
        assert_eq!(entity.get::<Health>().unwrap().current, 6);
    }

    #[test]
    fn test_filter_requires_every_kind() {
        let mut store = EntityStore::new();
        let both = store
            .create_entity()
            .with(Element::Fire)
            .with(CardStats::new(1, 1))
            .id();
        store.create_entity().with(Element::Metal);
        store.create_entity().with(CardStats::new(2, 2));

        let matches = store.ids_with_components(&[ComponentKind::Stats, ComponentKind::Element]);
        assert_eq!(matches, vec![both]);

        let none = store.ids_with_components(&[ComponentKind::Health, ComponentKind::Element]);
        assert!(none.is_empty());

        assert_eq!(store.get_entities_with_components(&[]).count(), 3);
    }

    #[test]
    fn test_remove_entity_is_idempotent() {
        let mut store = EntityStore::new();
        let id = store.create_entity().id();
        store.create_entity();

        assert!(store.remove_entity(id).is_some());
        assert!(store.remove_entity(id).is_none());
        assert_eq!(store.len(), 1);
        assert!(!store.contains(id));
    }
}
