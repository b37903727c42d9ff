//! Battle phases and the state machine that sequences them

pub mod phase;
pub mod rules;
pub mod scripted_rules;
pub mod state_machine;

pub use phase::{BattlePhase, PhaseChange};
pub use rules::BattleRules;
pub use scripted_rules::{BattleScript, RulesCall, ScriptedRules};
pub use state_machine::{
    BattleOutcome, BattleStateMachine, PhaseFlow, PhaseHandler, PhaseListener, StandardPhase,
};
