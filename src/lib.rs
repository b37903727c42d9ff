//! Elemental Battler - rules core for a turn-based elemental card battler
//!
//! Tracks entities and their component facets, drives per-tick systems,
//! sequences a battle through its phases, and assembles starting decks that
//! exploit the five-element generating cycle.

pub mod battle;
pub mod config;
pub mod core;
pub mod deck;
pub mod error;
pub mod logger;

pub use error::{BattleError, Result};
