//! Starting-deck assembly
//!
//! Each strategy fills a share of the deck from a themed pool, then tops up
//! any shortfall with random cards from the whole catalog. A card is used
//! at most once per deck, so a deck is never larger than the catalog. The
//! assembled deck is shuffled before it is returned.

use crate::core::{
    CardInfo, CardStats, CardType, Component, Element, EntityId, EntityStore, GENERATING_CYCLE,
};
use crate::deck::catalog::CardCatalog;
use crate::logger::{GameLogger, VerbosityLevel};
use crate::{BattleError, Result};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// Named deck-assembly strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeckStrategy {
    Random,
    ElementalFocus(Element),
    ComboOriented,
    DefensiveFocus,
    AggressiveFocus,
    SupportFocus,
}

impl fmt::Display for DeckStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckStrategy::Random => write!(f, "random"),
            DeckStrategy::ElementalFocus(element) => {
                write!(f, "elemental:{}", element.as_str().to_lowercase())
            }
            DeckStrategy::ComboOriented => write!(f, "combo"),
            DeckStrategy::DefensiveFocus => write!(f, "defensive"),
            DeckStrategy::AggressiveFocus => write!(f, "aggressive"),
            DeckStrategy::SupportFocus => write!(f, "support"),
        }
    }
}

impl FromStr for DeckStrategy {
    type Err = BattleError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        if let Some(element) = lower.strip_prefix("elemental:") {
            let element = element
                .parse::<Element>()
                .map_err(|_| BattleError::InvalidStrategy(s.to_string()))?;
            return Ok(DeckStrategy::ElementalFocus(element));
        }
        match lower.as_str() {
            "random" => Ok(DeckStrategy::Random),
            "combo" => Ok(DeckStrategy::ComboOriented),
            "defensive" => Ok(DeckStrategy::DefensiveFocus),
            "aggressive" => Ok(DeckStrategy::AggressiveFocus),
            "support" => Ok(DeckStrategy::SupportFocus),
            _ => Err(BattleError::InvalidStrategy(s.to_string())),
        }
    }
}

/// Slots taken by the themed pool of the role-focused strategies (percent)
const PRIMARY_SHARE: usize = 70;
/// Slots taken by the secondary element of the role-focused strategies (percent)
const SECONDARY_SHARE: usize = 20;
/// Slots taken by special cards under `SupportFocus` (percent)
const SUPPORT_SPECIAL_SHARE: usize = 40;
/// Minimum stat for a card to count as a defender or an attacker
const ROLE_STAT_THRESHOLD: i32 = 3;
const COMBO_PAIRS: usize = 2;
const COMBO_JOKERS: usize = 2;

/// `percent` of `deck_size`, rounded down without overflowing
fn share(deck_size: usize, percent: usize) -> usize {
    deck_size / 100 * percent + deck_size % 100 * percent / 100
}

#[derive(Debug, Clone, Copy)]
enum RoleStat {
    Attack,
    Defense,
}

/// Parameters shared by the defensive and aggressive strategies
struct RoleProfile {
    primary: [Element; 2],
    stat: RoleStat,
    secondary: Element,
}

/// Deck under construction: a capacity plus the cards chosen so far
struct DeckAssembly {
    capacity: usize,
    cards: Vec<EntityId>,
    used: FxHashSet<EntityId>,
}

impl DeckAssembly {
    fn new(capacity: usize) -> Self {
        DeckAssembly {
            capacity,
            cards: Vec::with_capacity(capacity),
            used: FxHashSet::default(),
        }
    }

    fn remaining(&self) -> usize {
        self.capacity - self.cards.len()
    }

    fn contains(&self, id: EntityId) -> bool {
        self.used.contains(&id)
    }

    fn push(&mut self, id: EntityId) -> bool {
        if self.remaining() == 0 || !self.used.insert(id) {
            return false;
        }
        self.cards.push(id);
        true
    }

    /// Take up to `count` unused cards from `pool` in random order
    fn take_from<R: Rng + ?Sized>(
        &mut self,
        pool: &[EntityId],
        count: usize,
        rng: &mut R,
    ) -> usize {
        let mut shuffled = pool.to_vec();
        shuffled.shuffle(rng);
        let mut taken = 0;
        for id in shuffled {
            if taken == count || self.remaining() == 0 {
                break;
            }
            if self.push(id) {
                taken += 1;
            }
        }
        taken
    }

    /// Alternate between two pools, falling back to whichever still has cards
    fn take_alternating<R: Rng + ?Sized>(
        &mut self,
        first: &[EntityId],
        second: &[EntityId],
        count: usize,
        rng: &mut R,
    ) -> usize {
        let mut first = first.to_vec();
        let mut second = second.to_vec();
        first.shuffle(rng);
        second.shuffle(rng);

        let mut taken = 0;
        let mut from_first = true;
        while taken < count && self.remaining() > 0 {
            let next = if from_first {
                self.next_unused(&mut first)
                    .or_else(|| self.next_unused(&mut second))
            } else {
                self.next_unused(&mut second)
                    .or_else(|| self.next_unused(&mut first))
            };
            let Some(id) = next else {
                break;
            };
            self.push(id);
            taken += 1;
            from_first = !from_first;
        }
        taken
    }

    fn next_unused(&self, pool: &mut Vec<EntityId>) -> Option<EntityId> {
        while let Some(id) = pool.pop() {
            if !self.used.contains(&id) {
                return Some(id);
            }
        }
        None
    }
}

/// Builds starting decks from a card catalog
pub struct DeckBuilder<'a, C: CardCatalog> {
    catalog: &'a C,
    seed: Option<u64>,
    logger: Option<&'a GameLogger>,
}

impl<'a, C: CardCatalog> DeckBuilder<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        DeckBuilder {
            catalog,
            seed: None,
            logger: None,
        }
    }

    /// Seed every call's generator for reproducible decks
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_logger(mut self, logger: &'a GameLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Assemble a deck of at most `deck_size` cards
    ///
    /// Uses a fresh generator per call.
    pub fn build_deck(&self, strategy: DeckStrategy, deck_size: usize) -> Vec<EntityId> {
        let mut rng = match self.seed {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_entropy(),
        };
        self.build_deck_with_rng(strategy, deck_size, &mut rng)
    }

    /// Assemble a deck drawing randomness from `rng`
    pub fn build_deck_with_rng<R: Rng + ?Sized>(
        &self,
        strategy: DeckStrategy,
        deck_size: usize,
        rng: &mut R,
    ) -> Vec<EntityId> {
        self.log(&format!("Building {deck_size}-card deck ({strategy})"));
        let all_cards = self.catalog.all_cards();
        // Cards are never repeated, so the catalog size bounds every deck
        let mut deck = DeckAssembly::new(deck_size.min(all_cards.len()));

        match strategy {
            DeckStrategy::Random => {}
            DeckStrategy::ElementalFocus(element) => {
                self.elemental_focus(&mut deck, element, rng)
            }
            DeckStrategy::ComboOriented => self.combo_oriented(&mut deck, rng),
            DeckStrategy::DefensiveFocus => self.role_focus(
                &mut deck,
                &RoleProfile {
                    primary: [Element::Metal, Element::Earth],
                    stat: RoleStat::Defense,
                    secondary: Element::Water,
                },
                rng,
            ),
            DeckStrategy::AggressiveFocus => self.role_focus(
                &mut deck,
                &RoleProfile {
                    primary: [Element::Fire, Element::Wood],
                    stat: RoleStat::Attack,
                    secondary: Element::Metal,
                },
                rng,
            ),
            DeckStrategy::SupportFocus => self.support_focus(&mut deck, rng),
        }

        let shortfall = deck.remaining();
        let padded = deck.take_from(&all_cards, shortfall, rng);
        if padded > 0 && strategy != DeckStrategy::Random {
            self.log(&format!("Padded {padded} slot(s) with random cards"));
        }
        if deck.cards.len() < deck_size {
            self.log(&format!(
                "Catalog exhausted; deck has {} of {deck_size} cards",
                deck.cards.len()
            ));
        }

        let mut cards = deck.cards;
        cards.shuffle(rng);
        cards
    }

    /// Copy each deck card's components into a fresh entity of `store`
    ///
    /// Every ID is checked before anything is created, so a bad deck leaves
    /// the store untouched.
    pub fn instantiate(&self, deck: &[EntityId], store: &mut EntityStore) -> Result<Vec<EntityId>> {
        let cards = deck
            .iter()
            .map(|id| self.catalog.card(*id).ok_or(BattleError::EntityNotFound(*id)))
            .collect::<Result<Vec<_>>>()?;

        Ok(cards
            .into_iter()
            .map(|card| {
                let entity = store.create_entity();
                for component in card.components() {
                    entity.add_component(Component::new(component.value().clone()));
                }
                entity.id()
            })
            .collect())
    }

    fn elemental_focus<R: Rng + ?Sized>(
        &self,
        deck: &mut DeckAssembly,
        focus: Element,
        rng: &mut R,
    ) {
        let focus_pool = self.catalog.get_cards_by_element(focus);
        deck.take_from(&focus_pool, share(deck.capacity, PRIMARY_SHARE), rng);

        let matching_specials: Vec<_> = focus_pool
            .iter()
            .copied()
            .filter(|id| self.card_type(*id).is_some_and(|t| t.is_special()))
            .collect();
        let rest = deck.remaining();
        deck.take_from(&matching_specials, rest, rng);

        let generator_pool = self.catalog.get_cards_by_element(focus.generated_by());
        let rest = deck.remaining();
        deck.take_from(&generator_pool, rest, rng);
    }

    fn combo_oriented<R: Rng + ?Sized>(&self, deck: &mut DeckAssembly, rng: &mut R) {
        let jokers = self.catalog.get_cards_by_type(CardType::Joker);
        // Joker slots are set aside before the pairs draw
        let reserved = COMBO_JOKERS.min(jokers.len()).min(deck.capacity);
        let per_pair = (deck.capacity - reserved) / 2;
        let pairs: SmallVec<[(Element, Element); COMBO_PAIRS]> = GENERATING_CYCLE
            .choose_multiple(rng, COMBO_PAIRS)
            .copied()
            .collect();

        for (generator, generated) in pairs {
            self.log(&format!("Combo pair {generator} -> {generated}"));
            let generator_pool = self.catalog.get_cards_by_element(generator);
            let generated_pool = self.catalog.get_cards_by_element(generated);
            deck.take_alternating(&generator_pool, &generated_pool, per_pair, rng);
        }

        deck.take_from(&jokers, COMBO_JOKERS, rng);
    }

    fn role_focus<R: Rng + ?Sized>(
        &self,
        deck: &mut DeckAssembly,
        profile: &RoleProfile,
        rng: &mut R,
    ) {
        let role_pool: Vec<_> = profile
            .primary
            .iter()
            .flat_map(|element| self.elemental_cards(*element))
            .filter(|id| {
                self.stats(*id).is_some_and(|stats| {
                    let value = match profile.stat {
                        RoleStat::Attack => stats.attack,
                        RoleStat::Defense => stats.defense,
                    };
                    value >= ROLE_STAT_THRESHOLD
                })
            })
            .collect();
        deck.take_from(&role_pool, share(deck.capacity, PRIMARY_SHARE), rng);

        let secondary_pool = self.elemental_cards(profile.secondary);
        deck.take_from(&secondary_pool, share(deck.capacity, SECONDARY_SHARE), rng);

        let specials: Vec<_> = self
            .special_cards()
            .into_iter()
            .filter(|id| self.element(*id).is_some_and(|e| profile.primary.contains(&e)))
            .collect();
        // At most one special aligned with the role elements
        if !specials.iter().any(|id| deck.contains(*id)) {
            deck.take_from(&specials, 1, rng);
        }
    }

    fn support_focus<R: Rng + ?Sized>(&self, deck: &mut DeckAssembly, rng: &mut R) {
        let specials = self.special_cards();
        deck.take_from(&specials, share(deck.capacity, SUPPORT_SPECIAL_SHARE), rng);

        // Deal one card per element in turn; the first elements in the
        // shuffled order receive any leftover slots
        let mut elements = Element::ALL;
        elements.shuffle(rng);
        let mut pools: Vec<Vec<EntityId>> = elements
            .iter()
            .map(|element| {
                let mut pool = self.catalog.get_cards_by_element(*element);
                pool.shuffle(rng);
                pool
            })
            .collect();

        while deck.remaining() > 0 {
            let mut dealt = false;
            for pool in pools.iter_mut() {
                if let Some(id) = deck.next_unused(pool) {
                    dealt |= deck.push(id);
                }
            }
            if !dealt {
                break;
            }
        }
    }

    fn special_cards(&self) -> Vec<EntityId> {
        CardType::SPECIAL
            .iter()
            .flat_map(|card_type| self.catalog.get_cards_by_type(*card_type))
            .collect()
    }

    /// Cards of `element` that are not special cards
    fn elemental_cards(&self, element: Element) -> Vec<EntityId> {
        self.catalog
            .get_cards_by_element(element)
            .into_iter()
            .filter(|id| self.card_type(*id) == Some(CardType::Elemental))
            .collect()
    }

    fn card_type(&self, id: EntityId) -> Option<CardType> {
        self.catalog
            .card(id)
            .and_then(|card| card.get::<CardInfo>())
            .map(|info| info.card_type)
    }

    fn element(&self, id: EntityId) -> Option<Element> {
        self.catalog.card(id).and_then(|card| card.get::<Element>()).copied()
    }

    fn stats(&self, id: EntityId) -> Option<CardStats> {
        self.catalog.card(id).and_then(|card| card.get::<CardStats>()).copied()
    }

    fn log(&self, message: &str) {
        if let Some(logger) = self.logger {
            logger.log(VerbosityLevel::Verbose, Some("deck"), message);
        }
    }
}
