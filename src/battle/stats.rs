use crate::pokemon::Combatant;
use schema::{DamageClass, StatType, StatusKind};
use serde::{Deserialize, Serialize};

pub const MIN_STAGE: i8 = -6;
pub const MAX_STAGE: i8 = 6;

/// Convert a stat stage into its multiplier.
/// Non-negative stages: (2 + stage) / 2. Negative stages: 2 / (2 - stage).
/// Out-of-range stages are clamped to -6..=6 first.
pub fn stage_multiplier(stage: i8) -> f64 {
    let clamped = stage.clamp(MIN_STAGE, MAX_STAGE) as f64;
    if clamped >= 0.0 {
        (2.0 + clamped) / 2.0
    } else {
        2.0 / (2.0 - clamped)
    }
}

/// Apply a stage multiplier to a stat, truncating toward zero.
pub fn apply_stat_stage_multiplier(base_stat: u16, stage: i8) -> u16 {
    if stage == 0 {
        return base_stat;
    }
    (base_stat as f64 * stage_multiplier(stage)).floor() as u16
}

/// Result of nudging one stage counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageChange {
    pub stat: StatType,
    pub old_stage: i8,
    pub new_stage: i8,
}

impl StageChange {
    /// True when the counter was already pinned at the bound in the requested direction.
    pub fn was_blocked(&self) -> bool {
        self.old_stage == self.new_stage
    }
}

/// Per-combatant stage counters for all seven axes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatStages([i8; StatType::COUNT]);

impl StatStages {
    pub fn get(&self, stat: StatType) -> i8 {
        self.0[stat.index()]
    }

    /// Set a stage directly, clamped to the legal range.
    pub fn set(&mut self, stat: StatType, stage: i8) {
        self.0[stat.index()] = stage.clamp(MIN_STAGE, MAX_STAGE);
    }

    /// Add `delta` stages to `stat`, saturating at the bounds.
    pub fn adjust(&mut self, stat: StatType, delta: i8) -> StageChange {
        let old_stage = self.get(stat);
        let new_stage = old_stage.saturating_add(delta).clamp(MIN_STAGE, MAX_STAGE);
        self.0[stat.index()] = new_stage;
        StageChange {
            stat,
            old_stage,
            new_stage,
        }
    }

    pub fn reset(&mut self) {
        self.0 = [0; StatType::COUNT];
    }

    pub fn is_neutral(&self) -> bool {
        self.0.iter().all(|&stage| stage == 0)
    }
}

/// Attack stat used by a move of the given class, with stages and burn applied.
pub fn effective_attack(combatant: &Combatant, class: DamageClass) -> u16 {
    let (raw, stat) = match class {
        DamageClass::Physical => (combatant.stats.attack, StatType::Attack),
        DamageClass::Special => (combatant.stats.special_attack, StatType::SpecialAttack),
        DamageClass::Status => return 0,
    };

    let mut attack = apply_stat_stage_multiplier(raw, combatant.stages.get(stat));

    // Burn halves physical attack
    if class == DamageClass::Physical && combatant.has_status(StatusKind::Burn) {
        attack /= 2;
    }

    attack.max(1)
}

/// Defense stat used against a move of the given class, with stages applied.
pub fn effective_defense(combatant: &Combatant, class: DamageClass) -> u16 {
    let (raw, stat) = match class {
        DamageClass::Physical => (combatant.stats.defense, StatType::Defense),
        DamageClass::Special => (combatant.stats.special_defense, StatType::SpecialDefense),
        DamageClass::Status => return 0,
    };

    apply_stat_stage_multiplier(raw, combatant.stages.get(stat)).max(1)
}

/// Speed used for turn order, with stages and paralysis applied.
pub fn effective_speed(combatant: &Combatant) -> u16 {
    let mut speed =
        apply_stat_stage_multiplier(combatant.stats.speed, combatant.stages.get(StatType::Speed));

    if combatant.has_status(StatusKind::Paralysis) {
        speed /= 4;
    }

    speed
}

/// Move accuracy after the attacker's accuracy and defender's evasion stages, capped at 100.
pub fn effective_accuracy(base_accuracy: u8, attacker: &Combatant, defender: &Combatant) -> f64 {
    let net_stage = attacker
        .stages
        .get(StatType::Accuracy)
        .saturating_sub(defender.stages.get(StatType::Evasion));
    (base_accuracy as f64 * stage_multiplier(net_stage)).min(100.0)
}
