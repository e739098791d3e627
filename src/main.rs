//! Demo driver for the arena engine.
//!
//! Run with: `pokemon-arena battle --trainer "Youngster Joey" --species 25 --level 18`

use clap::{Parser, Subcommand, ValueEnum};
use pokemon_arena::battle::state::Side;
use pokemon_arena::catalog::{Catalog, StaticCatalog};
use pokemon_arena::errors::CatalogError;
use pokemon_arena::loot::{LootGenerator, LootTotals, PackCatalog};
use pokemon_arena::quests::{DailyQuests, OpponentKind, QuestEvent};
use pokemon_arena::rewards::{distribute_rewards, RecordingSink};
use pokemon_arena::teams::{
    average_level, build_roster, find_gym_leader, find_trainer, roll_trainer_team, RosterEntry,
};
use pokemon_arena::{
    BattleRunner, BattleState, Behavior, EngineConfig, ProgressionTracker, RandomAI, ScoringAI,
    SeededRng,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

const OWNER: &str = "player";

#[derive(Parser)]
#[command(name = "pokemon-arena")]
#[command(about = "Battle and loot-pack simulator", long_about = None)]
#[command(version)]
struct Cli {
    /// Engine rules file (RON). Defaults are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fight a bundled trainer or gym leader
    Battle {
        /// RNG seed; omit for a random battle
        #[arg(long)]
        seed: Option<u64>,
        /// Trainer name or gym leader key
        #[arg(long, default_value = "Youngster Joey")]
        trainer: String,
        /// Species ids for your team, lead first
        #[arg(long = "species", default_values_t = [25u16])]
        species: Vec<u16>,
        #[arg(long, default_value_t = 15)]
        level: u32,
        /// How your side picks moves
        #[arg(long, value_enum, default_value_t = Policy::Scoring)]
        policy: Policy,
        #[arg(long, default_value_t = 100)]
        max_turns: u32,
    },
    /// Open one or more packs of a tier
    OpenPack {
        #[arg(long, default_value = "Basic Pack")]
        tier: String,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = 1)]
        count: u32,
    },
    /// Draw today's quests
    Quests {
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Policy {
    Scoring,
    Random,
}

impl Policy {
    fn behavior(self) -> Box<dyn Behavior> {
        match self {
            Policy::Scoring => Box::new(ScoringAI::new()),
            Policy::Random => Box::new(RandomAI),
        }
    }
}

fn rng_for(seed: Option<u64>) -> SeededRng {
    match seed {
        Some(seed) => SeededRng::from_seed(seed),
        None => SeededRng::from_entropy(),
    }
}

fn species_label(catalog: &StaticCatalog, species: pokemon_arena::SpeciesId) -> String {
    catalog
        .name(species)
        .unwrap_or_else(|_| format!("Pokemon {species}"))
}

fn run_battle(
    config: &EngineConfig,
    seed: Option<u64>,
    opponent: &str,
    species: &[u16],
    level: u32,
    policy: Policy,
    max_turns: u32,
) -> Result<(), Box<dyn Error>> {
    let catalog = StaticCatalog::bundled();
    let rules = &config.rules;
    let mut rng = rng_for(seed);

    let entries: Vec<RosterEntry> = species.iter().map(|&id| RosterEntry::new(id, level)).collect();
    let attacker_team = build_roster(catalog, &entries, &mut rng)?;

    let (label, defender_entries, plan, kind) = if let Some(leader) = find_gym_leader(opponent) {
        (leader.name.clone(), leader.team.clone(), leader.reward_plan(), OpponentKind::GymLeader)
    } else if let Some(trainer) = find_trainer(opponent) {
        let levels: Vec<u32> = entries.iter().map(|entry| entry.level).collect();
        let team = roll_trainer_team(trainer, average_level(&levels), &mut rng);
        (trainer.name.clone(), team, trainer.reward_plan(None), OpponentKind::Trainer)
    } else {
        return Err(format!("no trainer or gym leader named '{opponent}'").into());
    };
    let defender_team = build_roster(catalog, &defender_entries, &mut rng)?;

    let state = BattleState::new(
        format!("demo-{}", seed.unwrap_or_default()),
        "You",
        attacker_team,
        label,
        defender_team,
        rules,
    )?;
    for event in state.log.entries() {
        if let Some(line) = event.format(&state) {
            println!("{line}");
        }
    }

    let mut runner = BattleRunner::new(OWNER, state, Box::new(ScoringAI::new()), plan.clone());
    let mut own_policy = policy.behavior();
    while !runner.is_finished() && runner.state().turn_number < max_turns {
        let choice = own_policy.choose_move(runner.state(), Side::Attacker, &mut rng);
        let outcome = runner.submit_move(choice, rules, &mut rng)?;
        for event in &outcome.events {
            if let Some(line) = event.format(runner.state()) {
                println!("{line}");
            }
        }
    }
    if !runner.is_finished() {
        runner.abandon()?;
        println!("Turn limit reached, you left the battle.");
    }

    let mut tracker = ProgressionTracker::new();
    let mut sink = RecordingSink::new();
    let report = distribute_rewards(
        OWNER,
        runner.state().terminal_outcome(),
        &plan,
        rules,
        &mut tracker,
        &mut sink,
    );

    println!();
    println!("Result: {:?} after {} turns", report.outcome.result, report.outcome.turns);
    if report.currency > 0 {
        println!("Earned {} pokedollars", report.currency);
    }
    for award in &report.xp_awards {
        println!(
            "{} is now level {} ({} xp)",
            species_label(catalog, award.species),
            award.change.new_level,
            award.change.current_xp
        );
    }
    if let Some(pack) = &report.pack {
        println!("Received a {pack}");
    }

    let events = QuestEvent::from_rewards(&report, kind, catalog);
    info!(quest_events = events.len(), "battle finished");
    Ok(())
}

fn run_open_pack(tier: &str, seed: Option<u64>, count: u32) -> Result<(), Box<dyn Error>> {
    let catalog = StaticCatalog::bundled();
    let tier = PackCatalog::bundled().tier(tier)?;
    let mut rng = rng_for(seed);

    let configs = vec![&tier.config; count as usize];
    let results = LootGenerator::new().open_many(&configs, &mut rng);

    for (index, result) in results.iter().enumerate() {
        let mega = if result.is_mega { " (MEGA PACK!)" } else { "" };
        println!("{} #{}{}:", tier.name, index + 1, mega);
        for creature in &result.creatures {
            let mut tags = Vec::new();
            if creature.is_shiny {
                tags.push("shiny");
            } else if creature.promoted_shiny {
                tags.push("guaranteed shiny");
            }
            if creature.is_legendary {
                tags.push("legendary");
            }
            let label = match catalog.name(creature.species) {
                Ok(name) => name,
                Err(CatalogError::UnknownSpecies(id)) => format!("Pokemon {id}"),
                Err(err) => return Err(err.into()),
            };
            if tags.is_empty() {
                println!("  {label}");
            } else {
                println!("  {label} [{}]", tags.join(", "));
            }
        }
    }

    let totals = LootTotals::of(&results);
    println!(
        "Opened {} pack(s): {} creatures, {} shiny (+{} guaranteed), {} legendary, {} mega",
        totals.packs,
        totals.creatures,
        totals.shiny_count,
        totals.promoted_count,
        totals.legendary_count,
        totals.mega_packs
    );
    Ok(())
}

fn run_quests(seed: Option<u64>) {
    let mut rng = rng_for(seed);
    let quests = DailyQuests::generate(&mut rng);
    for (index, slot) in quests.iter().enumerate() {
        println!(
            "{}. {} (reward {})",
            index + 1,
            slot.quest.description,
            slot.quest.reward
        );
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => match EngineConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Error loading {}: {err}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => EngineConfig::default(),
    };

    let result = match cli.command {
        Command::Battle {
            seed,
            trainer,
            species,
            level,
            policy,
            max_turns,
        } => run_battle(&config, seed, &trainer, &species, level, policy, max_turns),
        Command::OpenPack { tier, seed, count } => run_open_pack(&tier, seed, count),
        Command::Quests { seed } => {
            run_quests(seed);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
