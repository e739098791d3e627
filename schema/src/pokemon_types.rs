use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PokemonType {
    Normal,
    Fire,
    Water,
    Grass,
    Electric,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

/// How a single attacking type fares against a single defending type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matchup {
    Immune,
    NotVeryEffective,
    Neutral,
    SuperEffective,
}

impl Matchup {
    pub fn multiplier(self) -> f64 {
        match self {
            Matchup::Immune => 0.0,
            Matchup::NotVeryEffective => 0.5,
            Matchup::Neutral => 1.0,
            Matchup::SuperEffective => 2.0,
        }
    }
}

impl PokemonType {
    /// Look up the matchup of an attacking type against one defending type.
    pub fn matchup(attacking: PokemonType, defending: PokemonType) -> Matchup {
        use Matchup::*;
        use PokemonType::*;

        match (attacking, defending) {
            // Normal
            (Normal, Ghost) => Immune,
            (Normal, Rock) | (Normal, Steel) => NotVeryEffective,
            (Normal, _) => Neutral,

            // Fire
            (Fire, Grass) | (Fire, Bug) | (Fire, Ice) | (Fire, Steel) => SuperEffective,
            (Fire, Fire) | (Fire, Water) | (Fire, Rock) | (Fire, Dragon) => NotVeryEffective,
            (Fire, _) => Neutral,

            // Water
            (Water, Fire) | (Water, Ground) | (Water, Rock) => SuperEffective,
            (Water, Water) | (Water, Grass) | (Water, Dragon) => NotVeryEffective,
            (Water, _) => Neutral,

            // Grass
            (Grass, Water) | (Grass, Ground) | (Grass, Rock) => SuperEffective,
            (Grass, Fire)
            | (Grass, Grass)
            | (Grass, Poison)
            | (Grass, Flying)
            | (Grass, Bug)
            | (Grass, Dragon)
            | (Grass, Steel) => NotVeryEffective,
            (Grass, _) => Neutral,

            // Electric
            (Electric, Ground) => Immune,
            (Electric, Water) | (Electric, Flying) => SuperEffective,
            (Electric, Electric) | (Electric, Grass) | (Electric, Dragon) => NotVeryEffective,
            (Electric, _) => Neutral,

            // Ice
            (Ice, Grass) | (Ice, Ground) | (Ice, Flying) | (Ice, Dragon) => SuperEffective,
            (Ice, Fire) | (Ice, Water) | (Ice, Ice) | (Ice, Steel) => NotVeryEffective,
            (Ice, _) => Neutral,

            // Fighting
            (Fighting, Ghost) => Immune,
            (Fighting, Normal)
            | (Fighting, Ice)
            | (Fighting, Rock)
            | (Fighting, Dark)
            | (Fighting, Steel) => SuperEffective,
            (Fighting, Poison)
            | (Fighting, Flying)
            | (Fighting, Psychic)
            | (Fighting, Bug)
            | (Fighting, Fairy) => NotVeryEffective,
            (Fighting, _) => Neutral,

            // Poison
            (Poison, Steel) => Immune,
            (Poison, Grass) | (Poison, Fairy) => SuperEffective,
            (Poison, Poison) | (Poison, Ground) | (Poison, Rock) | (Poison, Ghost) => {
                NotVeryEffective
            }
            (Poison, _) => Neutral,

            // Ground
            (Ground, Flying) => Immune,
            (Ground, Fire)
            | (Ground, Electric)
            | (Ground, Poison)
            | (Ground, Rock)
            | (Ground, Steel) => SuperEffective,
            (Ground, Grass) | (Ground, Bug) => NotVeryEffective,
            (Ground, _) => Neutral,

            // Flying
            (Flying, Grass) | (Flying, Fighting) | (Flying, Bug) => SuperEffective,
            (Flying, Electric) | (Flying, Rock) | (Flying, Steel) => NotVeryEffective,
            (Flying, _) => Neutral,

            // Psychic
            (Psychic, Dark) => Immune,
            (Psychic, Fighting) | (Psychic, Poison) => SuperEffective,
            (Psychic, Psychic) | (Psychic, Steel) => NotVeryEffective,
            (Psychic, _) => Neutral,

            // Bug
            (Bug, Grass) | (Bug, Psychic) | (Bug, Dark) => SuperEffective,
            (Bug, Fire)
            | (Bug, Fighting)
            | (Bug, Poison)
            | (Bug, Flying)
            | (Bug, Ghost)
            | (Bug, Steel)
            | (Bug, Fairy) => NotVeryEffective,
            (Bug, _) => Neutral,

            // Rock
            (Rock, Fire) | (Rock, Ice) | (Rock, Flying) | (Rock, Bug) => SuperEffective,
            (Rock, Fighting) | (Rock, Ground) | (Rock, Steel) => NotVeryEffective,
            (Rock, _) => Neutral,

            // Ghost
            (Ghost, Normal) => Immune,
            (Ghost, Psychic) | (Ghost, Ghost) => SuperEffective,
            (Ghost, Dark) => NotVeryEffective,
            (Ghost, _) => Neutral,

            // Dragon
            (Dragon, Fairy) => Immune,
            (Dragon, Dragon) => SuperEffective,
            (Dragon, Steel) => NotVeryEffective,
            (Dragon, _) => Neutral,

            // Dark
            (Dark, Psychic) | (Dark, Ghost) => SuperEffective,
            (Dark, Fighting) | (Dark, Dark) | (Dark, Fairy) => NotVeryEffective,
            (Dark, _) => Neutral,

            // Steel
            (Steel, Ice) | (Steel, Rock) | (Steel, Fairy) => SuperEffective,
            (Steel, Fire) | (Steel, Water) | (Steel, Electric) | (Steel, Steel) => {
                NotVeryEffective
            }
            (Steel, _) => Neutral,

            // Fairy
            (Fairy, Fighting) | (Fairy, Dragon) | (Fairy, Dark) => SuperEffective,
            (Fairy, Fire) | (Fairy, Poison) | (Fairy, Steel) => NotVeryEffective,
            (Fairy, _) => Neutral,
        }
    }

    /// Multiplier of an attacking type against a set of defending types.
    ///
    /// Any immunity zeroes the whole result; otherwise the per-type
    /// multipliers compose, so dual types can reach 4.0 or 0.25.
    /// Repeated defender types are only counted once.
    pub fn effectiveness(attacking: PokemonType, defending: &[PokemonType]) -> f64 {
        let mut multiplier = 1.0;

        for (i, defender) in defending.iter().enumerate() {
            if defending[..i].contains(defender) {
                continue;
            }
            match Self::matchup(attacking, *defender) {
                Matchup::Immune => return 0.0,
                matchup => multiplier *= matchup.multiplier(),
            }
        }

        multiplier
    }

    pub fn is_immune(attacking: PokemonType, defending: PokemonType) -> bool {
        Self::matchup(attacking, defending) == Matchup::Immune
    }
}
