use crate::PokemonType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// National dex number of a species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesId(pub u16);

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:03}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub special_attack: u16,
    pub special_defense: u16,
    pub speed: u16,
}

impl BaseStats {
    pub fn total(&self) -> u32 {
        [
            self.hp,
            self.attack,
            self.defense,
            self.special_attack,
            self.special_defense,
            self.speed,
        ]
        .iter()
        .map(|&stat| stat as u32)
        .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelMove {
    pub level: u8,
    pub move_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesData {
    pub id: SpeciesId,
    pub name: String,
    pub types: Vec<PokemonType>,
    pub base_stats: BaseStats,
    #[serde(default)]
    pub learnset: Vec<LevelMove>,
    #[serde(default)]
    pub legendary: bool,
}

impl SpeciesData {
    /// Names of moves learned at or below `max_level`, in learn order.
    pub fn moves_up_to(&self, max_level: u32) -> impl Iterator<Item = &str> {
        self.learnset
            .iter()
            .filter(move |entry| u32::from(entry.level) <= max_level)
            .map(|entry| entry.move_name.as_str())
    }
}
