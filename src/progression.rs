//! Shared species experience.
//!
//! XP is tracked per (owner, species), not per individual catch: every
//! Pikachu an owner has shares one level.

use schema::SpeciesId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

pub const XP_PER_LEVEL: u32 = 100;

/// Level reached with `xp` experience. Uncapped.
pub fn level_for_xp(xp: u32) -> u32 {
    xp / XP_PER_LEVEL + 1
}

/// Accumulated record of one species for one owner.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpeciesRecord {
    pub xp: u32,
    pub wins: u32,
    pub losses: u32,
}

impl SpeciesRecord {
    pub fn level(&self) -> u32 {
        level_for_xp(self.xp)
    }
}

/// Result of a single XP award.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelChange {
    pub leveled_up: bool,
    pub old_level: u32,
    pub new_level: u32,
    pub current_xp: u32,
}

/// Persisted per-species level lookup, used to size combatants at battle start.
pub trait SpeciesLevels {
    fn species_level(&self, owner: &str, species: SpeciesId) -> u32;
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ProgressionTracker {
    records: HashMap<String, HashMap<SpeciesId, SpeciesRecord>>,
}

impl ProgressionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add XP to an owner's species and count the battle as a win or a loss.
    pub fn add_xp(
        &mut self,
        owner: &str,
        species: SpeciesId,
        amount: u32,
        is_win: bool,
    ) -> LevelChange {
        let record = self
            .records
            .entry(owner.to_string())
            .or_default()
            .entry(species)
            .or_default();

        let old_level = record.level();
        record.xp = record.xp.saturating_add(amount);
        if is_win {
            record.wins += 1;
        } else {
            record.losses += 1;
        }
        let new_level = record.level();

        debug!(owner, %species, amount, old_level, new_level, "species xp added");

        LevelChange {
            leveled_up: new_level > old_level,
            old_level,
            new_level,
            current_xp: record.xp,
        }
    }

    pub fn record(&self, owner: &str, species: SpeciesId) -> Option<&SpeciesRecord> {
        self.records.get(owner)?.get(&species)
    }

    /// All species an owner has progress on, lowest id first.
    pub fn owner_records(&self, owner: &str) -> Vec<(SpeciesId, SpeciesRecord)> {
        let mut records: Vec<(SpeciesId, SpeciesRecord)> = self
            .records
            .get(owner)
            .map(|by_species| by_species.iter().map(|(id, record)| (*id, *record)).collect())
            .unwrap_or_default();
        records.sort_by_key(|(id, _)| *id);
        records
    }
}

impl SpeciesLevels for ProgressionTracker {
    fn species_level(&self, owner: &str, species: SpeciesId) -> u32 {
        self.record(owner, species)
            .map_or(1, SpeciesRecord::level)
    }
}
