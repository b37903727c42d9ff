//! Error types for the battle engine

use crate::battle::BattlePhase;
use crate::core::EntityId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BattleError {
    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    #[error("No handler registered for phase {0:?}")]
    UnregisteredPhase(BattlePhase),

    #[error("Command '{command}' is not accepted in phase {phase:?}")]
    InvalidCommand {
        command: &'static str,
        phase: Option<BattlePhase>,
    },

    #[error("Phase transitions did not settle (last requested: {0:?})")]
    TransitionLoop(BattlePhase),

    #[error("Invalid card catalog: {0}")]
    InvalidCatalog(String),

    #[error("Invalid deck strategy: {0}")]
    InvalidStrategy(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for BattleError {
    fn from(err: serde_json::Error) -> Self {
        BattleError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BattleError>;
