//! Pokemon Arena
//!
//! Turn-based battle resolution and loot-pack generation for a creature
//! collecting game. The engine is computation only: catalog data, rewards
//! and persistence come from the host through small traits.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod loot;
pub mod pokemon;
pub mod progression;
pub mod quests;
pub mod rewards;
pub mod rng;
pub mod teams;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    Ailment, BaseStats, DamageClass, EffectTarget, MoveData, PokemonType, SpeciesData, SpeciesId,
    StatChange, StatType, StatusKind,
};

// --- From this crate's modules (`src/`) ---

// Battle engine entry points and session state.
pub use battle::ai::{Behavior, RandomAI, ScoringAI, ScriptedAI};
pub use battle::engine::{resolve_turn, validate_move, TurnOutcome};
pub use battle::registry::{Challenge, SessionId, SessionRegistry, TurnReport};
pub use battle::runner::BattleRunner;
pub use battle::state::{BattleEvent, BattleState, GameState, Side, TerminalOutcome};

// Runtime combatants, rosters and opponents.
pub use pokemon::{BattleStats, Combatant, StatusCondition};
pub use teams::{
    build_combatant, build_owned_roster, build_roster, roll_trainer_team, GymLeader, RosterEntry,
    TrainerTemplate,
};

// Data access and configuration.
pub use catalog::{Catalog, StaticCatalog};
pub use config::{BattleRules, EngineConfig};
pub use rng::{BattleRng, ScriptedRng, SeededRng};

// Progression, rewards and daily quests.
pub use progression::{ProgressionTracker, SpeciesLevels};
pub use quests::{DailyQuests, QuestEvent};
pub use rewards::{RecordingSink, RewardPlan, RewardReport, RewardSink};

// Loot packs.
pub use loot::{LootGenerator, LootResult, PackCatalog, PackConfig};

// Crate-specific error and result types.
pub use errors::{
    ActionError, BattleEngineError, BattleResult, CatalogError, PackConfigError, RewardSinkError,
    SessionError,
};
