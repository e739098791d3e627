use crate::battle::state::GameState;
use schema::SpeciesId;
use thiserror::Error;

/// Main error type for the Pokemon Arena engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BattleEngineError {
    /// Error related to invalid player actions
    #[error("Action error: {0}")]
    Action(#[from] ActionError),
    /// Error related to session lookup or lifecycle
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
    /// Error related to pack configuration
    #[error("Pack config error: {0}")]
    PackConfig(#[from] PackConfigError),
    /// Error related to species or move lookup
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    /// Error raised by an external reward sink
    #[error("Reward sink error: {0}")]
    RewardSink(#[from] RewardSinkError),
}

/// Errors related to player actions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Move index is out of bounds for the active combatant
    #[error("Invalid move index {index}: the active combatant knows {available} move(s)")]
    InvalidMoveIndex { index: usize, available: usize },
    /// The side has no combatant able to act
    #[error("No active combatant on the {0} side")]
    NoActiveCombatant(&'static str),
    /// Action is not valid in the current battle state
    #[error("Battle is not accepting moves (state: {0:?})")]
    NotInProgress(GameState),
}

/// Errors related to the battle session lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Unknown session {0}")]
    UnknownSession(u64),
    #[error("Owner '{0}' is already in a battle")]
    OwnerAlreadyInBattle(String),
    #[error("Session is not waiting for a roster selection (state: {0:?})")]
    NotAwaitingSelection(GameState),
    #[error("Session has already ended (state: {0:?})")]
    AlreadyTerminal(GameState),
    #[error("Roster for the {0} side is empty")]
    EmptyRoster(&'static str),
}

/// Errors raised while loading or validating a pack configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PackConfigError {
    #[error("min_count ({min}) exceeds max_count ({max})")]
    MinExceedsMax { min: u32, max: u32 },
    #[error("{field} must be a probability in [0, 1], got {value}")]
    ProbabilityOutOfRange { field: &'static str, value: f64 },
    #[error("mega_size must be at least 1 when mega_chance is {chance}")]
    MegaSizeZero { chance: f64 },
    #[error("{field} is set but its count is 0")]
    GuaranteeCountZero { field: &'static str },
    #[error("Unknown pack tier '{0}'")]
    UnknownTier(String),
    #[error("Failed to parse pack config: {0}")]
    Parse(String),
}

/// Errors related to species and move catalog lookups
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Species not found: {0}")]
    UnknownSpecies(SpeciesId),
    #[error("Move '{name}' learned by {species} is not in the move table")]
    UnknownMove { species: SpeciesId, name: String },
    #[error("Malformed catalog data: {0}")]
    Malformed(String),
}

/// Opaque failure reported by a persistence layer behind a reward sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} failed: {message}")]
pub struct RewardSinkError {
    pub operation: &'static str,
    pub message: String,
}

impl RewardSinkError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

/// Type alias for Results using BattleEngineError
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Type alias for Results using ActionError
pub type ActionResult<T> = Result<T, ActionError>;

/// Type alias for Results using SessionError
pub type SessionResult<T> = Result<T, SessionError>;

/// Type alias for Results using PackConfigError
pub type PackConfigResult<T> = Result<T, PackConfigError>;

/// Type alias for Results using CatalogError
pub type CatalogResult<T> = Result<T, CatalogError>;
