//! Elemental Battler - command-line driver
//!
//! Builds starting decks from a JSON card catalog and walks a battle through
//! its phases with the scripted rules engine.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use elemental_battler::{
    battle::{BattleScript, BattleStateMachine, BattlePhase, ScriptedRules},
    config::GameConfig,
    core::{
        CardInfo, Combatant, DefeatCleanupSystem, Element, EntityStore, Health, Side,
        SystemScheduler,
    },
    deck::{CardCatalog, DeckBuilder, DeckStrategy, InMemoryCatalog},
    logger::{GameLogger, VerbosityLevel},
};
use std::path::{Path, PathBuf};

/// Fixed tick length used when driving the scheduler
const TICK_SECONDS: f32 = 1.0 / 60.0;
const COMBATANT_HEALTH: i32 = 30;

#[derive(Parser)]
#[command(name = "battler")]
#[command(about = "Elemental card battler rules engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble a starting deck and print it
    BuildDeck {
        /// Card catalog (JSON)
        #[arg(value_name = "CATALOG")]
        catalog: PathBuf,

        /// random, elemental:<element>, combo, defensive, aggressive, support
        #[arg(long, default_value = "random")]
        strategy: DeckStrategy,

        /// Number of cards in the deck
        #[arg(long, default_value_t = 20)]
        size: usize,

        /// Set random seed for deterministic decks
        #[arg(long)]
        seed: Option<u64>,

        /// Verbosity level (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, default_value = "normal", short = 'v')]
        verbosity: VerbosityLevel,
    },

    /// Drive one battle through every phase with scripted rules
    Simulate {
        /// Game configuration (JSON); defaults apply when omitted
        #[arg(long, value_name = "CONFIG")]
        config: Option<PathBuf>,

        /// Card catalog used to deal the player's starting deck
        #[arg(long, value_name = "CATALOG")]
        catalog: Option<PathBuf>,

        /// Player defeats the enemy on this turn
        #[arg(long, conflicts_with = "enemy_wins_on_turn")]
        player_wins_on_turn: Option<u32>,

        /// Enemy defeats the player on this turn
        #[arg(long)]
        enemy_wins_on_turn: Option<u32>,

        /// Override the configured verbosity
        #[arg(long, short = 'v')]
        verbosity: Option<VerbosityLevel>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::BuildDeck {
            catalog,
            strategy,
            size,
            seed,
            verbosity,
        } => build_deck(&catalog, strategy, size, seed, verbosity),
        Commands::Simulate {
            config,
            catalog,
            player_wins_on_turn,
            enemy_wins_on_turn,
            verbosity,
        } => {
            let mut config = match config {
                Some(path) => GameConfig::load_from_file(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => GameConfig::default(),
            };
            if let Some(turn) = player_wins_on_turn {
                config.script = BattleScript::PlayerWinsOnTurn(turn);
            }
            if let Some(turn) = enemy_wins_on_turn {
                config.script = BattleScript::EnemyWinsOnTurn(turn);
            }
            if let Some(verbosity) = verbosity {
                config.verbosity = verbosity;
            }
            simulate(&config, catalog.as_deref())
        }
    }
}

fn load_catalog(path: &Path) -> anyhow::Result<InMemoryCatalog> {
    InMemoryCatalog::load_from_file(path)
        .with_context(|| format!("loading catalog {}", path.display()))
}

fn build_deck(
    catalog_path: &Path,
    strategy: DeckStrategy,
    size: usize,
    seed: Option<u64>,
    verbosity: VerbosityLevel,
) -> anyhow::Result<()> {
    let catalog = load_catalog(catalog_path)?;
    let logger = GameLogger::with_verbosity(verbosity);

    let mut builder = DeckBuilder::new(&catalog).with_logger(&logger);
    if let Some(seed) = seed {
        builder = builder.with_seed(seed);
    }
    let deck = builder.build_deck(strategy, size);

    logger.minimal(&format!("Deck ({strategy}, {} cards):", deck.len()));
    for id in &deck {
        let Some(card) = catalog.card(*id) else {
            continue;
        };
        let name = card.get::<CardInfo>().map(|info| info.name.as_str()).unwrap_or("?");
        let element = card.get::<Element>().map(Element::as_str).unwrap_or("-");
        logger.normal(&format!("{name} [{element}]"));
    }
    Ok(())
}

fn simulate(config: &GameConfig, catalog_path: Option<&Path>) -> anyhow::Result<()> {
    let mut store = EntityStore::new();
    let player = store.create_entity();
    player
        .with(Combatant {
            name: "Player".to_string(),
            side: Side::Player,
        })
        .with(Health::new(COMBATANT_HEALTH));
    let player_id = player.id();

    let enemy = store.create_entity();
    enemy
        .with(Combatant {
            name: "Enemy".to_string(),
            side: Side::Enemy,
        })
        .with(Health::new(COMBATANT_HEALTH));
    let enemy_id = enemy.id();

    let logger = GameLogger::with_verbosity(config.verbosity);

    if let Some(path) = catalog_path {
        let catalog = load_catalog(path)?;
        let mut builder = DeckBuilder::new(&catalog).with_logger(&logger);
        if let Some(seed) = config.seed {
            builder = builder.with_seed(seed);
        }
        let deck = builder.build_deck(config.strategy, config.deck_size);
        let dealt = builder.instantiate(&deck, &mut store)?;
        logger.normal(&format!("Dealt {} cards ({})", dealt.len(), config.strategy));
    }

    let mut scheduler = SystemScheduler::new();
    scheduler.add_system(DefeatCleanupSystem::new());

    let rules = ScriptedRules::new(player_id, enemy_id, config.script);
    let mut machine = BattleStateMachine::new(rules).with_logger(logger.clone());
    machine.start()?;

    while !machine.is_finished() {
        scheduler.update_all_systems(&mut store, TICK_SECONDS);
        machine.update(TICK_SECONDS)?;

        match machine.current_phase() {
            Some(BattlePhase::CardSelection) => {
                if machine.rules().turn() > config.max_turns {
                    bail!("battle still running after {} turns", config.max_turns);
                }
                machine.confirm_card_selection()?;
            }
            Some(BattlePhase::Reward) => machine.claim_reward()?,
            other => bail!("battle stalled in phase {other:?}"),
        }
    }

    logger.minimal(&format!(
        "Outcome: {:?} after {} turn(s), {} phase changes",
        machine.outcome(),
        machine.rules().turn(),
        machine.transitions().len()
    ));
    Ok(())
}
