//! Game configuration loaded from JSON
//!
//! Every field has a default, so an empty object `{}` is a valid config.

use crate::battle::BattleScript;
use crate::deck::DeckStrategy;
use crate::logger::VerbosityLevel;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Cards per starting deck
    pub deck_size: usize,
    pub strategy: DeckStrategy,
    /// Seed for deck building (None draws from entropy)
    pub seed: Option<u64>,
    pub verbosity: VerbosityLevel,
    /// Safety limit on rounds when driving a battle
    pub max_turns: u32,
    /// How the scripted rules engine ends the battle
    pub script: BattleScript,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            deck_size: 20,
            strategy: DeckStrategy::Random,
            seed: None,
            verbosity: VerbosityLevel::Normal,
            max_turns: 50,
            script: BattleScript::PlayerWinsOnTurn(3),
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Element;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = GameConfig::from_json("{}").unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let json = r#"{
            "deck_size": 12,
            "strategy": {"ElementalFocus": "Water"},
            "seed": 42,
            "script": {"EnemyWinsOnTurn": 2}
        }"#;
        let config = GameConfig::from_json(json).unwrap();
        assert_eq!(config.deck_size, 12);
        assert_eq!(config.strategy, DeckStrategy::ElementalFocus(Element::Water));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.script, BattleScript::EnemyWinsOnTurn(2));
        assert_eq!(config.max_turns, 50);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        assert!(GameConfig::from_json(r#"{"deck_size": "many"}"#).is_err());
    }
}
