//! Battle phases

use serde::{Deserialize, Serialize};
use std::fmt;

/// One named stage of a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattlePhase {
    Initialization,
    PlayerTurnStart,
    CardSelection,
    CardResolution,
    PlayerTurnEnd,
    EnemyTurnStart,
    EnemyAction,
    EnemyTurnEnd,
    SupportCardCheck,
    BattleEnd,
    Reward,
}

impl BattlePhase {
    pub const ALL: [BattlePhase; 11] = [
        BattlePhase::Initialization,
        BattlePhase::PlayerTurnStart,
        BattlePhase::CardSelection,
        BattlePhase::CardResolution,
        BattlePhase::PlayerTurnEnd,
        BattlePhase::EnemyTurnStart,
        BattlePhase::EnemyAction,
        BattlePhase::EnemyTurnEnd,
        BattlePhase::SupportCardCheck,
        BattlePhase::BattleEnd,
        BattlePhase::Reward,
    ];

    /// Phases that wait for an external command before progressing
    pub fn awaits_command(&self) -> bool {
        matches!(self, BattlePhase::CardSelection | BattlePhase::Reward)
    }
}

impl fmt::Display for BattlePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Record of one phase hop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseChange {
    /// Phase that was active before the hop (None for the first hop)
    pub previous: Option<BattlePhase>,
    pub next: BattlePhase,
}

impl fmt::Display for PhaseChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.previous {
            Some(previous) => write!(f, "{previous} -> {}", self.next),
            None => write!(f, "start -> {}", self.next),
        }
    }
}
