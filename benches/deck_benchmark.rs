//! Performance benchmarks for deck assembly and battle sequencing
//!
//! Deck builds run every strategy against `test_catalogs/five_elements.json`
//! with a fixed seed. The battle benchmark drives a scripted battle from
//! start to reward with logging silenced.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use elemental_battler::{
    battle::{BattlePhase, BattleScript, BattleStateMachine, ScriptedRules},
    core::{Element, EntityId, EntityStore},
    deck::{DeckBuilder, DeckStrategy, InMemoryCatalog},
    logger::{GameLogger, VerbosityLevel},
    Result,
};
use std::path::PathBuf;

const STRATEGIES: [DeckStrategy; 6] = [
    DeckStrategy::Random,
    DeckStrategy::ElementalFocus(Element::Fire),
    DeckStrategy::ComboOriented,
    DeckStrategy::DefensiveFocus,
    DeckStrategy::AggressiveFocus,
    DeckStrategy::SupportFocus,
];

fn load_catalog() -> Result<InMemoryCatalog> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_catalogs/five_elements.json");
    InMemoryCatalog::load_from_file(&path)
}

fn bench_build_deck(c: &mut Criterion) {
    let catalog = match load_catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Skipping benchmark - failed to load catalog: {}", e);
            return;
        }
    };

    let mut group = c.benchmark_group("build_deck");
    let seed = 42u64;
    for strategy in STRATEGIES {
        group.bench_with_input(
            BenchmarkId::new(strategy.to_string(), seed),
            &strategy,
            |b, &strategy| {
                let builder = DeckBuilder::new(&catalog).with_seed(seed);
                b.iter(|| builder.build_deck(black_box(strategy), black_box(20)));
            },
        );
    }
    group.finish();
}

fn bench_deal_deck(c: &mut Criterion) {
    let catalog = match load_catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Skipping benchmark - failed to load catalog: {}", e);
            return;
        }
    };
    let builder = DeckBuilder::new(&catalog).with_seed(7);
    let deck = builder.build_deck(DeckStrategy::SupportFocus, 20);

    c.bench_function("deal_deck", |b| {
        b.iter(|| {
            let mut store = EntityStore::new();
            builder
                .instantiate(black_box(&deck), &mut store)
                .expect("catalog cards should instantiate")
        });
    });
}

fn bench_scripted_battle(c: &mut Criterion) {
    let mut group = c.benchmark_group("scripted_battle");
    for turns in [1u32, 10, 50] {
        group.bench_with_input(BenchmarkId::new("player_wins", turns), &turns, |b, &turns| {
            b.iter(|| {
                let rules = ScriptedRules::new(
                    EntityId::new(0),
                    EntityId::new(1),
                    BattleScript::PlayerWinsOnTurn(turns),
                );
                let mut machine = BattleStateMachine::new(rules)
                    .with_logger(GameLogger::with_verbosity(VerbosityLevel::Silent));
                machine.start().expect("battle should start");
                while !machine.is_finished() {
                    match machine.current_phase() {
                        Some(BattlePhase::CardSelection) => machine
                            .confirm_card_selection()
                            .expect("selection should confirm"),
                        _ => machine.claim_reward().expect("reward should be claimable"),
                    }
                }
                machine.transitions().len()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build_deck, bench_deal_deck, bench_scripted_battle);
criterion_main!(benches);
