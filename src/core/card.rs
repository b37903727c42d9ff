//! Card data carried as components

use crate::BattleError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Card categories
///
/// Everything except `Elemental` is a special card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Elemental,
    DivineBeast,
    SpiritAnimal,
    Joker,
}

impl CardType {
    pub const SPECIAL: [CardType; 3] =
        [CardType::DivineBeast, CardType::SpiritAnimal, CardType::Joker];

    pub fn is_special(&self) -> bool {
        !matches!(self, CardType::Elemental)
    }
}

impl FromStr for CardType {
    type Err = BattleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "elemental" => Ok(CardType::Elemental),
            "divinebeast" => Ok(CardType::DivineBeast),
            "spiritanimal" => Ok(CardType::SpiritAnimal),
            "joker" => Ok(CardType::Joker),
            _ => Err(BattleError::ParseError(format!("unknown card type '{s}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

/// Catalog key of a card definition (e.g., "fire_phoenix")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardKey(String);

impl CardKey {
    pub fn new(s: impl Into<String>) -> Self {
        CardKey(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CardKey {
    fn from(s: &str) -> Self {
        CardKey(s.to_string())
    }
}

/// Identity of a card: catalog key, display name, category and rarity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardInfo {
    pub key: CardKey,
    pub name: String,
    pub card_type: CardType,
    pub rarity: Rarity,
}

impl CardInfo {
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        card_type: CardType,
        rarity: Rarity,
    ) -> Self {
        CardInfo {
            key: CardKey::new(key),
            name: name.into(),
            card_type,
            rarity,
        }
    }
}

/// Combat numbers printed on a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CardStats {
    pub attack: i32,
    pub defense: i32,
}

impl CardStats {
    pub fn new(attack: i32, defense: i32) -> Self {
        CardStats { attack, defense }
    }
}
