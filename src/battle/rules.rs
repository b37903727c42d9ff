//! Interface to the battle-rules engine
//!
//! The state machine only sequences phases. Damage, healing and support
//! effects live behind this trait; from the state machine's point of view
//! every command always completes.

use crate::core::EntityId;

pub trait BattleRules {
    fn initialize_battle(&mut self);

    fn start_player_turn(&mut self);

    fn check_support_cards(&mut self);

    fn resolve_selected_cards(&mut self);

    fn end_player_turn(&mut self);

    fn start_enemy_turn(&mut self);

    fn perform_enemy_action(&mut self);

    fn end_enemy_turn(&mut self);

    fn end_battle(&mut self);

    fn give_rewards(&mut self);

    fn is_battle_over(&self) -> bool;

    /// Winning entity, once the battle is over
    fn winner(&self) -> Option<EntityId>;

    fn player_entity(&self) -> EntityId;
}
