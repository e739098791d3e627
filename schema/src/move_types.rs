use crate::{PokemonType, StatType, StatusKind};
use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DamageClass {
    Physical,
    Special,
    Status,
}

/// Who a secondary effect lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectTarget {
    User,
    Opponent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatChange {
    pub target: EffectTarget,
    pub stat: StatType,
    pub stages: i8,
}

/// A status condition a move may inflict on hit, with a percent chance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ailment {
    pub status: StatusKind,
    pub chance: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    pub name: String,
    pub power: u16,
    pub accuracy: u8,
    pub move_type: PokemonType,
    pub damage_class: DamageClass,
    #[serde(default)]
    pub stat_changes: Vec<StatChange>,
    #[serde(default)]
    pub ailment: Option<Ailment>,
}

impl MoveData {
    pub const FALLBACK_NAME: &'static str = "Tackle";

    /// The move every creature can fall back on when its learnset is empty.
    pub fn tackle() -> Self {
        Self {
            name: Self::FALLBACK_NAME.to_string(),
            power: 40,
            accuracy: 100,
            move_type: PokemonType::Normal,
            damage_class: DamageClass::Physical,
            stat_changes: Vec::new(),
            ailment: None,
        }
    }

    pub fn scratch() -> Self {
        Self {
            name: "Scratch".to_string(),
            ..Self::tackle()
        }
    }

    /// Lowers the opponent's attack by one stage.
    pub fn growl() -> Self {
        Self::opponent_debuff("Growl", StatType::Attack)
    }

    /// Lowers the opponent's defense by one stage.
    pub fn tail_whip() -> Self {
        Self::opponent_debuff("Tail Whip", StatType::Defense)
    }

    fn opponent_debuff(name: &str, stat: StatType) -> Self {
        Self {
            name: name.to_string(),
            power: 0,
            accuracy: 100,
            move_type: PokemonType::Normal,
            damage_class: DamageClass::Status,
            stat_changes: vec![StatChange {
                target: EffectTarget::Opponent,
                stat,
                stages: -1,
            }],
            ailment: None,
        }
    }

    /// True for status moves that only raise the user's own stats.
    pub fn is_self_buff(&self) -> bool {
        self.is_status()
            && self.ailment.is_none()
            && !self.stat_changes.is_empty()
            && self
                .stat_changes
                .iter()
                .all(|change| change.target == EffectTarget::User && change.stages > 0)
    }

    /// Status-class moves and zero-power moves never deal damage.
    pub fn is_status(&self) -> bool {
        self.damage_class == DamageClass::Status || self.power == 0
    }
}
