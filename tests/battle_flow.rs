//! End-to-end battle sequencing with the scripted rules engine

use elemental_battler::battle::{
    BattleOutcome, BattlePhase, BattleRules, BattleScript, BattleStateMachine, PhaseChange, RulesCall,
    ScriptedRules,
};
use elemental_battler::core::EntityId;
use elemental_battler::BattleError;
use similar_asserts::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

const PLAYER: EntityId = EntityId::new(0);
const ENEMY: EntityId = EntityId::new(1);

fn machine(script: BattleScript) -> BattleStateMachine<ScriptedRules> {
    BattleStateMachine::new(ScriptedRules::new(PLAYER, ENEMY, script))
}

/// Confirm selections and claim rewards until the battle finishes
fn play_out(machine: &mut BattleStateMachine<ScriptedRules>, max_rounds: usize) {
    machine.start().unwrap();
    for _ in 0..max_rounds {
        if machine.is_finished() {
            return;
        }
        match machine.current_phase() {
            Some(BattlePhase::CardSelection) => machine.confirm_card_selection().unwrap(),
            Some(BattlePhase::Reward) => machine.claim_reward().unwrap(),
            other => panic!("unexpected resting phase {other:?}"),
        }
    }
    panic!("battle did not finish in {max_rounds} rounds");
}

fn phases(machine: &BattleStateMachine<ScriptedRules>) -> Vec<BattlePhase> {
    machine.transitions().iter().map(|c| c.next).collect()
}

#[test]
fn test_player_victory_sequence() {
    let mut machine = machine(BattleScript::PlayerWinsOnTurn(2));
    play_out(&mut machine, 10);

    use BattlePhase::*;
    assert_eq!(
        phases(&machine),
        vec![
            Initialization,
            PlayerTurnStart,
            SupportCardCheck,
            CardSelection,
            CardResolution,
            PlayerTurnEnd,
            EnemyTurnStart,
            EnemyAction,
            EnemyTurnEnd,
            PlayerTurnStart,
            SupportCardCheck,
            CardSelection,
            CardResolution,
            BattleEnd,
            Reward,
        ]
    );
    assert_eq!(machine.outcome(), Some(BattleOutcome::Victory));
    assert_eq!(machine.rules().count(RulesCall::GiveRewards), 1);
}

#[test]
fn test_enemy_victory_skips_reward() {
    let mut machine = machine(BattleScript::EnemyWinsOnTurn(1));
    play_out(&mut machine, 10);

    use BattlePhase::*;
    assert_eq!(
        phases(&machine),
        vec![
            Initialization,
            PlayerTurnStart,
            SupportCardCheck,
            CardSelection,
            CardResolution,
            PlayerTurnEnd,
            EnemyTurnStart,
            EnemyAction,
            BattleEnd,
        ]
    );
    assert_eq!(machine.current_phase(), Some(BattleEnd));
    assert_eq!(machine.outcome(), Some(BattleOutcome::Defeat));
    assert_eq!(machine.rules().count(RulesCall::GiveRewards), 0);
    assert!(matches!(
        machine.claim_reward(),
        Err(BattleError::InvalidCommand { .. })
    ));
}

#[test]
fn test_rules_commands_follow_phases() {
    let mut machine = machine(BattleScript::PlayerWinsOnTurn(1));
    play_out(&mut machine, 10);

    assert_eq!(
        machine.rules().calls().to_vec(),
        vec![
            RulesCall::InitializeBattle,
            RulesCall::StartPlayerTurn,
            RulesCall::CheckSupportCards,
            RulesCall::ResolveSelectedCards,
            RulesCall::EndBattle,
            RulesCall::GiveRewards,
        ]
    );
}

#[test]
fn test_initialization_happens_once() {
    for turns in 1..6 {
        let mut machine = machine(BattleScript::PlayerWinsOnTurn(turns));
        play_out(&mut machine, 20);

        let phases = phases(&machine);
        assert_eq!(phases.iter().filter(|p| **p == BattlePhase::Initialization).count(), 1);
        assert_eq!(phases[1], BattlePhase::PlayerTurnStart);
        assert_eq!(machine.rules().count(RulesCall::StartPlayerTurn), turns as usize);
    }
}

#[test]
fn test_battle_end_only_after_battle_over_checks() {
    for script in [
        BattleScript::PlayerWinsOnTurn(3),
        BattleScript::EnemyWinsOnTurn(2),
        BattleScript::EnemyWinsOnTurn(4),
    ] {
        let mut machine = machine(script);
        play_out(&mut machine, 20);

        for change in machine.transitions() {
            if change.next == BattlePhase::BattleEnd {
                assert!(matches!(
                    change.previous,
                    Some(BattlePhase::CardResolution) | Some(BattlePhase::EnemyAction)
                ));
            }
            if change.next == BattlePhase::Reward {
                assert_eq!(change.previous, Some(BattlePhase::BattleEnd));
                assert_eq!(machine.rules().winner(), Some(PLAYER));
            }
        }
    }
}

#[test]
fn test_listeners_get_one_notification_per_hop() {
    let first = Rc::new(RefCell::new(Vec::<PhaseChange>::new()));
    let second = Rc::new(RefCell::new(0usize));

    let mut machine = machine(BattleScript::PlayerWinsOnTurn(2));
    let sink = Rc::clone(&first);
    machine.add_listener(move |change: &PhaseChange| sink.borrow_mut().push(*change));
    let counter = Rc::clone(&second);
    machine.add_listener(move |_: &PhaseChange| *counter.borrow_mut() += 1);

    play_out(&mut machine, 10);

    assert_eq!(first.borrow().as_slice(), machine.transitions());
    assert_eq!(*second.borrow(), machine.transitions().len());
    // Each hop starts where the previous one ended
    for pair in first.borrow().windows(2) {
        assert_eq!(pair[1].previous, Some(pair[0].next));
    }
}

#[test]
fn test_endless_battle_keeps_cycling() {
    let mut machine = machine(BattleScript::Endless);
    machine.start().unwrap();
    for _ in 0..25 {
        machine.confirm_card_selection().unwrap();
        assert_eq!(machine.current_phase(), Some(BattlePhase::CardSelection));
    }
    assert_eq!(machine.rules().turn(), 26);
    assert_eq!(machine.outcome(), None);
    assert!(!machine.is_finished());
}
