use crate::battle::state::BattleState;
use crate::catalog::{Catalog, StaticCatalog};
use crate::config::BattleRules;
use crate::pokemon::{BattleStats, Combatant, StatusCondition, MAX_MOVES};
use crate::rng::ScriptedRng;
use schema::{MoveData, SpeciesId};

/// A builder for creating test combatants from the bundled catalog.
///
/// # Example
/// ```ignore
/// let pikachu = TestCombatantBuilder::new(25, 20)
///     .with_moves(vec![move_named("Thunder Shock")])
///     .with_status(StatusCondition::new(StatusKind::Paralysis))
///     .build();
/// ```
pub struct TestCombatantBuilder {
    species: SpeciesId,
    level: u32,
    moves: Option<Vec<MoveData>>,
    status: Option<StatusCondition>,
    current_hp: Option<u16>,
    stats: Option<BattleStats>,
}

impl TestCombatantBuilder {
    /// Creates a new builder for a given species id and level.
    pub fn new(species: u16, level: u32) -> Self {
        Self {
            species: SpeciesId(species),
            level,
            moves: None,
            status: None,
            current_hp: None,
            stats: None,
        }
    }

    /// Sets the moves. If not set, the species' learnset up to `level` is used.
    pub fn with_moves(mut self, moves: Vec<MoveData>) -> Self {
        self.moves = Some(moves);
        self
    }

    pub fn with_status(mut self, status: StatusCondition) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the current HP. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    /// Overrides the computed battle stats. HP starts at the new maximum.
    pub fn with_stats(mut self, stats: BattleStats) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn build(self) -> Combatant {
        let catalog = StaticCatalog::bundled();
        let data = match catalog.species(self.species) {
            Ok(data) => data.clone(),
            Err(err) => panic!("Failed to load species data for {}: {}", self.species, err),
        };
        // Without explicit moves, the four most recently learned ones
        let moves = match self.moves {
            Some(moves) => moves,
            None => {
                let mut learned = catalog
                    .learnable_moves(self.species, self.level)
                    .unwrap_or_else(|err| {
                        panic!("Failed to load moves for {}: {}", self.species, err)
                    });
                let keep_from = learned.len().saturating_sub(MAX_MOVES);
                learned.split_off(keep_from)
            }
        };

        let mut combatant = Combatant::new(
            data.id,
            data.name,
            self.level,
            data.base_stats,
            data.types,
            moves,
        );

        if let Some(stats) = self.stats {
            combatant.stats = stats;
            combatant.set_hp(stats.max_hp);
        }
        combatant.status = self.status;
        if let Some(hp) = self.current_hp {
            combatant.set_hp(hp);
        }

        combatant
    }
}

/// Look up a bundled move by name, panicking if it does not exist.
pub fn move_named(name: &str) -> MoveData {
    match StaticCatalog::bundled().move_data(name) {
        Some(move_data) => move_data.clone(),
        None => panic!("Move '{}' is not in the bundled catalog", name),
    }
}

/// Creates a standard 1v1 session, already in progress, between "Player" and "Rival".
pub fn create_test_session(attacker: Combatant, defender: Combatant) -> BattleState {
    create_team_session(vec![attacker], vec![defender])
}

pub fn create_team_session(attackers: Vec<Combatant>, defenders: Vec<Combatant>) -> BattleState {
    match BattleState::new(
        "test_battle",
        "Player",
        attackers,
        "Rival",
        defenders,
        &BattleRules::default(),
    ) {
        Ok(state) => state,
        Err(err) => panic!("Failed to create test session: {}", err),
    }
}

/// A scripted source with a generous buffer of mid-range rolls.
///
/// 0.5 means: every accuracy check hits, no critical hits, no status procs
/// below 50%, and a mid-range damage spread.
pub fn predictable_rng() -> ScriptedRng {
    ScriptedRng::new(vec![0.5; 100])
}

/// Stats with every offensive and defensive value at 50, for scenarios
/// where only HP and turn order matter.
pub fn flat_stats(max_hp: u16, speed: u16) -> BattleStats {
    BattleStats {
        max_hp,
        attack: 50,
        defense: 50,
        special_attack: 50,
        special_defense: 50,
        speed,
    }
}
