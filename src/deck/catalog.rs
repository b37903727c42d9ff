//! Card catalog queried by the deck builder
//!
//! A catalog owns one entity per card definition. Queries hand out entity
//! IDs in definition order and never mutate the catalog.

use crate::core::{
    CardInfo, CardStats, CardType, Element, Entity, EntityId, EntityStore, Rarity,
};
use crate::{BattleError, Result};
use rand::seq::SliceRandom;
use rand::RngCore;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Read-only card lookups
pub trait CardCatalog {
    /// Every card, in definition order
    fn all_cards(&self) -> Vec<EntityId>;

    /// Entity for a card ID handed out by this catalog
    fn card(&self, id: EntityId) -> Option<&Entity>;

    fn get_card_by_key_name(&self, key: &str) -> Option<EntityId>;

    fn get_cards_by_element(&self, element: Element) -> Vec<EntityId> {
        self.filter_cards(&|card: &Entity| card.get::<Element>() == Some(&element))
    }

    fn get_cards_by_type(&self, card_type: CardType) -> Vec<EntityId> {
        self.filter_cards(&|card: &Entity| {
            card.get::<CardInfo>()
                .is_some_and(|info| info.card_type == card_type)
        })
    }

    fn get_cards_by_rarity(&self, rarity: Rarity) -> Vec<EntityId> {
        self.filter_cards(&|card: &Entity| {
            card.get::<CardInfo>()
                .is_some_and(|info| info.rarity == rarity)
        })
    }

    /// Cards matching `predicate`, in definition order
    fn filter_cards(&self, predicate: &dyn Fn(&Entity) -> bool) -> Vec<EntityId> {
        self.all_cards()
            .into_iter()
            .filter(|id| self.card(*id).is_some_and(predicate))
            .collect()
    }

    /// Draw `size` distinct cards at random
    ///
    /// With `balanced`, draws rotate through the five elements before any
    /// card without an element is used.
    fn create_random_deck(
        &self,
        size: usize,
        balanced: bool,
        rng: &mut dyn RngCore,
    ) -> Vec<EntityId> {
        let mut all = self.all_cards();
        all.shuffle(rng);
        if !balanced {
            all.truncate(size);
            return all;
        }

        let mut pools: Vec<Vec<EntityId>> = Element::ALL
            .iter()
            .map(|element| {
                all.iter()
                    .copied()
                    .filter(|id| self.card(*id).and_then(|c| c.get::<Element>()) == Some(element))
                    .collect()
            })
            .collect();

        let mut deck = Vec::with_capacity(size);
        while deck.len() < size && pools.iter().any(|p| !p.is_empty()) {
            for pool in pools.iter_mut() {
                if deck.len() == size {
                    break;
                }
                if let Some(id) = pool.pop() {
                    deck.push(id);
                }
            }
        }

        for id in all {
            if deck.len() == size {
                break;
            }
            if !deck.contains(&id) {
                deck.push(id);
            }
        }
        deck
    }
}

/// One card as written in a catalog file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub key: String,
    pub name: String,
    #[serde(default = "default_card_type")]
    pub card_type: CardType,
    #[serde(default = "default_rarity")]
    pub rarity: Rarity,
    #[serde(default)]
    pub element: Option<Element>,
    #[serde(default)]
    pub attack: i32,
    #[serde(default)]
    pub defense: i32,
}

fn default_card_type() -> CardType {
    CardType::Elemental
}

fn default_rarity() -> Rarity {
    Rarity::Common
}

impl CardDefinition {
    /// Elemental card with the given stats
    pub fn elemental(key: impl Into<String>, element: Element, attack: i32, defense: i32) -> Self {
        let key = key.into();
        CardDefinition {
            name: key.clone(),
            key,
            card_type: CardType::Elemental,
            rarity: Rarity::Common,
            element: Some(element),
            attack,
            defense,
        }
    }

    /// Special card, optionally aligned with an element
    pub fn special(key: impl Into<String>, card_type: CardType, element: Option<Element>) -> Self {
        let key = key.into();
        CardDefinition {
            name: key.clone(),
            key,
            card_type,
            rarity: Rarity::Rare,
            element,
            attack: 0,
            defense: 0,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.key.trim().is_empty() {
            return Err(BattleError::InvalidCatalog(format!(
                "card '{}' has an empty key",
                self.name
            )));
        }
        if self.card_type == CardType::Elemental && self.element.is_none() {
            return Err(BattleError::InvalidCatalog(format!(
                "elemental card '{}' has no element",
                self.key
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    cards: Vec<CardDefinition>,
}

/// Catalog held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    store: EntityStore,
    order: Vec<EntityId>,
    by_key: FxHashMap<String, EntityId>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_definitions(definitions: impl IntoIterator<Item = CardDefinition>) -> Result<Self> {
        let mut catalog = Self::new();
        for definition in definitions {
            catalog.add_card(definition)?;
        }
        Ok(catalog)
    }

    /// Parse a catalog from JSON of the form `{"cards": [...]}`
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::from_definitions(file.cards)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Register a card definition; keys must be unique
    pub fn add_card(&mut self, definition: CardDefinition) -> Result<EntityId> {
        definition.validate()?;
        if self.by_key.contains_key(&definition.key) {
            return Err(BattleError::InvalidCatalog(format!(
                "duplicate card key '{}'",
                definition.key
            )));
        }

        let entity = self.store.create_entity();
        entity
            .with(CardInfo::new(
                definition.key.clone(),
                definition.name,
                definition.card_type,
                definition.rarity,
            ))
            .with(CardStats::new(definition.attack, definition.defense));
        if let Some(element) = definition.element {
            entity.with(element);
        }
        let id = entity.id();

        self.order.push(id);
        self.by_key.insert(definition.key, id);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl CardCatalog for InMemoryCatalog {
    fn all_cards(&self) -> Vec<EntityId> {
        self.order.clone()
    }

    fn card(&self, id: EntityId) -> Option<&Entity> {
        self.store.get_entity(id)
    }

    fn get_card_by_key_name(&self, key: &str) -> Option<EntityId> {
        self.by_key.get(key).copied()
    }
}
