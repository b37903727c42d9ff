//! Battle phase state machine
//!
//! Sequences one battle from `Initialization` to `BattleEnd`/`Reward`,
//! issuing commands to a [`BattleRules`] engine as each phase is entered.
//!
//! Entering a phase may immediately request the next one; such chains are
//! processed iteratively inside [`BattleStateMachine::change_state`], and
//! every hop is recorded and delivered to listeners in order. The chain
//! stops at a phase that waits for an external command (`CardSelection`,
//! `Reward`) or at a terminal `BattleEnd`.

/// Logs a phase-category message when verbose logging is compiled in
macro_rules! log_if_verbose {
    ($logger:expr, $level:expr, $($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        {
            $logger.log($level, Some("phase"), &format!($($arg)*));
        }
        #[cfg(not(feature = "verbose-logging"))]
        {
            let _ = &$logger; // Suppress unused variable warning
        }
    };
}

use crate::battle::phase::{BattlePhase, PhaseChange};
use crate::battle::rules::BattleRules;
use crate::logger::{GameLogger, VerbosityLevel};
use crate::{BattleError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Upper bound on hops processed by one `change_state` call
pub const MAX_CHAINED_TRANSITIONS: usize = 32;

/// What a phase wants after one of its hooks ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseFlow {
    /// Remain in the current phase
    Stay,
    /// Move on to the given phase
    Advance(BattlePhase),
}

/// Behavior attached to one phase
pub trait PhaseHandler<R: BattleRules> {
    /// Called when the phase becomes active
    fn enter(&mut self, rules: &mut R) -> PhaseFlow;

    /// Per-tick hook while the phase is active
    fn update(&mut self, _rules: &mut R, _delta_time: f32) -> PhaseFlow {
        PhaseFlow::Stay
    }

    /// Called when the phase stops being active
    fn exit(&mut self, _rules: &mut R) {}
}

/// The standard phase table
///
/// | Phase            | Command                  | Next                               |
/// |------------------|--------------------------|------------------------------------|
/// | Initialization   | `initialize_battle`      | PlayerTurnStart                    |
/// | PlayerTurnStart  | `start_player_turn`      | SupportCardCheck                   |
/// | SupportCardCheck | `check_support_cards`    | CardSelection                      |
/// | CardSelection    | -                        | waits for `confirm_card_selection` |
/// | CardResolution   | `resolve_selected_cards` | BattleEnd if over, else PlayerTurnEnd |
/// | PlayerTurnEnd    | `end_player_turn`        | EnemyTurnStart                     |
/// | EnemyTurnStart   | `start_enemy_turn`       | EnemyAction                        |
/// | EnemyAction      | `perform_enemy_action`   | BattleEnd if over, else EnemyTurnEnd |
/// | EnemyTurnEnd     | `end_enemy_turn`         | PlayerTurnStart                    |
/// | BattleEnd        | `end_battle`             | Reward if the player won           |
/// | Reward           | `give_rewards`           | waits for `claim_reward`           |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardPhase(pub BattlePhase);

impl<R: BattleRules> PhaseHandler<R> for StandardPhase {
    fn enter(&mut self, rules: &mut R) -> PhaseFlow {
        use BattlePhase::*;
        match self.0 {
            Initialization => {
                rules.initialize_battle();
                PhaseFlow::Advance(PlayerTurnStart)
            }
            PlayerTurnStart => {
                rules.start_player_turn();
                PhaseFlow::Advance(SupportCardCheck)
            }
            SupportCardCheck => {
                rules.check_support_cards();
                PhaseFlow::Advance(CardSelection)
            }
            CardSelection => PhaseFlow::Stay,
            CardResolution => {
                rules.resolve_selected_cards();
                if rules.is_battle_over() {
                    PhaseFlow::Advance(BattleEnd)
                } else {
                    PhaseFlow::Advance(PlayerTurnEnd)
                }
            }
            PlayerTurnEnd => {
                rules.end_player_turn();
                PhaseFlow::Advance(EnemyTurnStart)
            }
            EnemyTurnStart => {
                rules.start_enemy_turn();
                PhaseFlow::Advance(EnemyAction)
            }
            EnemyAction => {
                rules.perform_enemy_action();
                if rules.is_battle_over() {
                    PhaseFlow::Advance(BattleEnd)
                } else {
                    PhaseFlow::Advance(EnemyTurnEnd)
                }
            }
            EnemyTurnEnd => {
                rules.end_enemy_turn();
                PhaseFlow::Advance(PlayerTurnStart)
            }
            BattleEnd => {
                rules.end_battle();
                if player_won(rules) {
                    PhaseFlow::Advance(Reward)
                } else {
                    PhaseFlow::Stay
                }
            }
            Reward => {
                rules.give_rewards();
                PhaseFlow::Stay
            }
        }
    }
}

fn player_won<R: BattleRules>(rules: &R) -> bool {
    rules.winner() == Some(rules.player_entity())
}

/// Receives a notification for every phase hop
pub trait PhaseListener {
    fn on_phase_changed(&mut self, change: &PhaseChange);
}

impl<F> PhaseListener for F
where
    F: FnMut(&PhaseChange),
{
    fn on_phase_changed(&mut self, change: &PhaseChange) {
        self(change)
    }
}

/// How a finished battle went for the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleOutcome {
    Victory,
    Defeat,
}

/// Drives one battle through its phases
pub struct BattleStateMachine<R: BattleRules> {
    rules: R,
    phases: FxHashMap<BattlePhase, Box<dyn PhaseHandler<R>>>,
    current: Option<BattlePhase>,
    listeners: Vec<Box<dyn PhaseListener>>,
    transitions: Vec<PhaseChange>,
    outcome: Option<BattleOutcome>,
    rewards_claimed: bool,
    logger: GameLogger,
}

impl<R: BattleRules> BattleStateMachine<R> {
    /// State machine with the standard handler registered for every phase
    pub fn new(rules: R) -> Self {
        let mut machine = Self::empty(rules);
        for phase in BattlePhase::ALL {
            machine.register(phase, StandardPhase(phase));
        }
        machine
    }

    /// State machine with no phases registered
    pub fn empty(rules: R) -> Self {
        BattleStateMachine {
            rules,
            phases: FxHashMap::default(),
            current: None,
            listeners: Vec::new(),
            transitions: Vec::new(),
            outcome: None,
            rewards_claimed: false,
            logger: GameLogger::new(),
        }
    }

    /// Register (or replace) the handler for `phase`
    pub fn register(&mut self, phase: BattlePhase, handler: impl PhaseHandler<R> + 'static) {
        self.phases.insert(phase, Box::new(handler));
    }

    pub fn is_registered(&self, phase: BattlePhase) -> bool {
        self.phases.contains_key(&phase)
    }

    pub fn with_logger(mut self, logger: GameLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn logger(&self) -> &GameLogger {
        &self.logger
    }

    pub fn add_listener(&mut self, listener: impl PhaseListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn current_phase(&self) -> Option<BattlePhase> {
        self.current
    }

    /// Every hop taken so far, in order
    pub fn transitions(&self) -> &[PhaseChange] {
        &self.transitions
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    /// True once nothing else can happen in this battle
    pub fn is_finished(&self) -> bool {
        match self.outcome {
            Some(BattleOutcome::Defeat) => true,
            Some(BattleOutcome::Victory) => self.rewards_claimed,
            None => false,
        }
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    /// Begin the battle by entering `Initialization`
    pub fn start(&mut self) -> Result<()> {
        if self.current.is_some() {
            return Err(self.rejected("start"));
        }
        self.change_state(BattlePhase::Initialization)
    }

    /// Forward a tick to the active phase
    pub fn update(&mut self, delta_time: f32) -> Result<()> {
        let Some(current) = self.current else {
            return Ok(());
        };
        let flow = match self.phases.get_mut(&current) {
            Some(handler) => handler.update(&mut self.rules, delta_time),
            None => return Err(BattleError::UnregisteredPhase(current)),
        };
        match flow {
            PhaseFlow::Advance(next) => self.change_state(next),
            PhaseFlow::Stay => Ok(()),
        }
    }

    /// Finish card selection and move on to resolution
    pub fn confirm_card_selection(&mut self) -> Result<()> {
        if self.current != Some(BattlePhase::CardSelection) {
            return Err(self.rejected("confirm_card_selection"));
        }
        log_if_verbose!(self.logger, VerbosityLevel::Normal, "Card selection confirmed");
        self.change_state(BattlePhase::CardResolution)
    }

    /// Accept the rewards and finish the battle
    pub fn claim_reward(&mut self) -> Result<()> {
        if self.current != Some(BattlePhase::Reward) || self.rewards_claimed {
            return Err(self.rejected("claim_reward"));
        }
        if let Some(handler) = self.phases.get_mut(&BattlePhase::Reward) {
            handler.exit(&mut self.rules);
        }
        self.rewards_claimed = true;
        log_if_verbose!(self.logger, VerbosityLevel::Minimal, "Rewards claimed");
        Ok(())
    }

    /// Make `next` the active phase, following any chained transitions
    ///
    /// Stops with an error before entering any phase that has no registered
    /// handler; hops already taken in the chain remain recorded.
    pub fn change_state(&mut self, next: BattlePhase) -> Result<()> {
        let mut pending = Some(next);
        let mut hops = 0;

        while let Some(next) = pending.take() {
            if hops == MAX_CHAINED_TRANSITIONS {
                return Err(BattleError::TransitionLoop(next));
            }
            hops += 1;

            if !self.phases.contains_key(&next) {
                return Err(BattleError::UnregisteredPhase(next));
            }

            if let Some(previous) = self.current {
                if let Some(handler) = self.phases.get_mut(&previous) {
                    handler.exit(&mut self.rules);
                }
            }

            let change = PhaseChange {
                previous: self.current,
                next,
            };
            self.current = Some(next);
            self.transitions.push(change);
            log_if_verbose!(self.logger, VerbosityLevel::Normal, "{change}");
            for listener in self.listeners.iter_mut() {
                listener.on_phase_changed(&change);
            }

            let flow = match self.phases.get_mut(&next) {
                Some(handler) => handler.enter(&mut self.rules),
                None => return Err(BattleError::UnregisteredPhase(next)),
            };

            if next == BattlePhase::BattleEnd {
                self.record_outcome();
            }

            if let PhaseFlow::Advance(following) = flow {
                pending = Some(following);
            }
        }
        Ok(())
    }

    fn record_outcome(&mut self) {
        let outcome = if player_won(&self.rules) {
            BattleOutcome::Victory
        } else {
            BattleOutcome::Defeat
        };
        log_if_verbose!(self.logger, VerbosityLevel::Minimal, "Battle over: {outcome:?}");
        self.outcome = Some(outcome);
    }

    fn rejected(&self, command: &'static str) -> BattleError {
        BattleError::InvalidCommand {
            command,
            phase: self.current,
        }
    }
}

impl<R: BattleRules> std::fmt::Debug for BattleStateMachine<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleStateMachine")
            .field("current", &self.current)
            .field("registered", &self.phases.len())
            .field("transitions", &self.transitions.len())
            .field("outcome", &self.outcome)
            .finish()
    }
}
