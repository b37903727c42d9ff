//! Scripted battle-rules engine for testing and demos
//!
//! Applies no real card effects. It records each command it receives and
//! declares the battle over on a predetermined turn with a predetermined
//! winner.

use crate::battle::rules::BattleRules;
use crate::core::EntityId;
use serde::{Deserialize, Serialize};

/// A command received from the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RulesCall {
    InitializeBattle,
    StartPlayerTurn,
    CheckSupportCards,
    ResolveSelectedCards,
    EndPlayerTurn,
    StartEnemyTurn,
    PerformEnemyAction,
    EndEnemyTurn,
    EndBattle,
    GiveRewards,
}

/// When and how the scripted battle ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleScript {
    /// Player's card resolution on this turn defeats the enemy
    PlayerWinsOnTurn(u32),
    /// Enemy's action on this turn defeats the player
    EnemyWinsOnTurn(u32),
    /// Never ends on its own
    Endless,
}

#[derive(Debug, Clone)]
pub struct ScriptedRules {
    player: EntityId,
    enemy: EntityId,
    script: BattleScript,
    turn: u32,
    winner: Option<EntityId>,
    calls: Vec<RulesCall>,
}

impl ScriptedRules {
    pub fn new(player: EntityId, enemy: EntityId, script: BattleScript) -> Self {
        ScriptedRules {
            player,
            enemy,
            script,
            turn: 0,
            winner: None,
            calls: Vec::new(),
        }
    }

    /// Current turn number (1 after the first player turn starts)
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn calls(&self) -> &[RulesCall] {
        &self.calls
    }

    pub fn count(&self, call: RulesCall) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }
}

impl BattleRules for ScriptedRules {
    fn initialize_battle(&mut self) {
        self.calls.push(RulesCall::InitializeBattle);
        self.turn = 0;
        self.winner = None;
    }

    fn start_player_turn(&mut self) {
        self.calls.push(RulesCall::StartPlayerTurn);
        self.turn += 1;
    }

    fn check_support_cards(&mut self) {
        self.calls.push(RulesCall::CheckSupportCards);
    }

    fn resolve_selected_cards(&mut self) {
        self.calls.push(RulesCall::ResolveSelectedCards);
        if self.script == BattleScript::PlayerWinsOnTurn(self.turn) {
            self.winner = Some(self.player);
        }
    }

    fn end_player_turn(&mut self) {
        self.calls.push(RulesCall::EndPlayerTurn);
    }

    fn start_enemy_turn(&mut self) {
        self.calls.push(RulesCall::StartEnemyTurn);
    }

    fn perform_enemy_action(&mut self) {
        self.calls.push(RulesCall::PerformEnemyAction);
        if self.script == BattleScript::EnemyWinsOnTurn(self.turn) {
            self.winner = Some(self.enemy);
        }
    }

    fn end_enemy_turn(&mut self) {
        self.calls.push(RulesCall::EndEnemyTurn);
    }

    fn end_battle(&mut self) {
        self.calls.push(RulesCall::EndBattle);
    }

    fn give_rewards(&mut self) {
        self.calls.push(RulesCall::GiveRewards);
    }

    fn is_battle_over(&self) -> bool {
        self.winner.is_some()
    }

    fn winner(&self) -> Option<EntityId> {
        self.winner
    }

    fn player_entity(&self) -> EntityId {
        self.player
    }
}
