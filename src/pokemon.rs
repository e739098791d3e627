use crate::battle::stats::StatStages;
use schema::{BaseStats, MoveData, PokemonType, SpeciesId, StatusKind};
use serde::{Deserialize, Serialize};

pub const MAX_MOVES: usize = 4;

/// Stats a combatant fights with, derived purely from base stats and level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleStats {
    pub max_hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub special_attack: u16,
    pub special_defense: u16,
    pub speed: u16,
}

impl BattleStats {
    /// Levels are uncapped; stats saturate at `u16::MAX`.
    pub fn from_base(base: &BaseStats, level: u32) -> Self {
        // floor(1.5 * level) without going through floats
        let offense_bonus = level.saturating_mul(3) / 2;
        let grow = |stat: u16, bonus: u32| {
            u16::try_from(u32::from(stat).saturating_add(bonus)).unwrap_or(u16::MAX)
        };

        Self {
            max_hp: grow(base.hp, level.saturating_mul(2)),
            attack: grow(base.attack, offense_bonus),
            defense: grow(base.defense, level),
            special_attack: grow(base.special_attack, offense_bonus),
            special_defense: grow(base.special_defense, level),
            speed: base.speed,
        }
    }
}

/// A major status together with its counter.
///
/// For sleep the counter is the number of turns left asleep; for bad poison
/// it is the number of damage ticks taken so far. Other kinds ignore it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCondition {
    pub kind: StatusKind,
    pub counter: u8,
}

impl StatusCondition {
    pub fn new(kind: StatusKind) -> Self {
        Self { kind, counter: 0 }
    }

    pub fn asleep(turns: u8) -> Self {
        Self {
            kind: StatusKind::Sleep,
            counter: turns,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub species: SpeciesId,
    pub name: String,
    pub level: u32,
    pub types: Vec<PokemonType>,
    pub base_stats: BaseStats,
    pub stats: BattleStats,
    pub moves: Vec<MoveData>,
    current_hp: u16,
    pub stages: StatStages,
    pub status: Option<StatusCondition>,
}

impl Combatant {
    /// Create a fresh combatant at full HP. Only the first four moves are kept.
    pub fn new(
        species: SpeciesId,
        name: impl Into<String>,
        level: u32,
        base_stats: BaseStats,
        types: Vec<PokemonType>,
        mut moves: Vec<MoveData>,
    ) -> Self {
        moves.truncate(MAX_MOVES);
        let stats = BattleStats::from_base(&base_stats, level);

        Self {
            species,
            name: name.into(),
            level,
            types,
            base_stats,
            stats,
            moves,
            current_hp: stats.max_hp,
            stages: StatStages::default(),
            status: None,
        }
    }

    pub fn current_hp(&self) -> u16 {
        self.current_hp
    }

    pub fn max_hp(&self) -> u16 {
        self.stats.max_hp
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    /// Set HP directly, clamped to `0..=max_hp`.
    pub fn set_hp(&mut self, hp: u16) {
        self.current_hp = hp.min(self.max_hp());
    }

    /// Apply damage. Returns true if this damage caused the combatant to faint.
    pub fn take_damage(&mut self, damage: u16) -> bool {
        if self.is_fainted() {
            return false;
        }
        self.current_hp = self.current_hp.saturating_sub(damage);
        self.is_fainted()
    }

    /// Restore HP up to the maximum. Fainted combatants cannot be healed.
    pub fn heal(&mut self, amount: u16) {
        if self.is_fainted() {
            return;
        }
        self.current_hp = self.current_hp.saturating_add(amount).min(self.max_hp());
    }

    pub fn has_status(&self, kind: StatusKind) -> bool {
        self.status.is_some_and(|status| status.kind == kind)
    }

    pub fn has_type(&self, pokemon_type: PokemonType) -> bool {
        self.types.contains(&pokemon_type)
    }

    /// Clear stat stages and status, as when entering the field.
    pub fn reset_on_switch_in(&mut self) {
        self.stages.reset();
        self.status = None;
    }
}
