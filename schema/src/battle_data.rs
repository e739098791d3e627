use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// The seven axes a stat stage can be applied to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
#[serde(rename_all = "snake_case")]
pub enum StatType {
    Attack,
    Defense,
    #[strum(to_string = "Special Attack")]
    SpecialAttack,
    #[strum(to_string = "Special Defense")]
    SpecialDefense,
    Speed,
    #[strum(to_string = "accuracy")]
    Accuracy,
    #[strum(to_string = "evasiveness")]
    Evasion,
}

impl StatType {
    pub const COUNT: usize = 7;

    pub fn index(self) -> usize {
        match self {
            StatType::Attack => 0,
            StatType::Defense => 1,
            StatType::SpecialAttack => 2,
            StatType::SpecialDefense => 3,
            StatType::Speed => 4,
            StatType::Accuracy => 5,
            StatType::Evasion => 6,
        }
    }
}

/// Major status conditions. A combatant carries at most one.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    #[strum(to_string = "burn")]
    Burn,
    #[strum(to_string = "poison")]
    Poison,
    #[strum(to_string = "bad poison")]
    BadlyPoisoned,
    #[strum(to_string = "paralysis")]
    Paralysis,
    #[strum(to_string = "sleep")]
    Sleep,
    #[strum(to_string = "freeze")]
    Freeze,
}
