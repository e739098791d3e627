//! Major status conditions: what they stop, what they cost, how they land.

use crate::battle::state::ActionFailureReason;
use crate::pokemon::{Combatant, StatusCondition};
use crate::rng::BattleRng;
use schema::{Ailment, StatusKind};

pub const FREEZE_THAW_CHANCE: f64 = 0.20;
pub const PARALYSIS_FULL_STOP_CHANCE: f64 = 0.25;
pub const SLEEP_MIN_TURNS: u32 = 1;
pub const SLEEP_MAX_TURNS: u32 = 3;

/// Outcome of the pre-action status check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreActionCheck {
    pub prevented: Option<ActionFailureReason>,
    /// Status that wore off during the check (woke up, thawed).
    pub cured: Option<StatusKind>,
}

/// Residual damage taken at the end of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResidualTick {
    pub kind: StatusKind,
    pub damage: u16,
    pub fainted: bool,
}

/// Decide whether the combatant's status stops it from acting this turn.
/// Prevented actions still consume the turn.
pub fn check_action_prevention(
    combatant: &mut Combatant,
    rng: &mut dyn BattleRng,
) -> PreActionCheck {
    let Some(status) = combatant.status else {
        return PreActionCheck::default();
    };

    match status.kind {
        StatusKind::Sleep => {
            if status.counter == 0 {
                combatant.status = None;
                return PreActionCheck {
                    prevented: None,
                    cured: Some(StatusKind::Sleep),
                };
            }
            let turns_left = status.counter - 1;
            if turns_left == 0 {
                combatant.status = None;
            } else {
                combatant.status = Some(StatusCondition::asleep(turns_left));
            }
            PreActionCheck {
                prevented: Some(ActionFailureReason::IsAsleep),
                cured: (turns_left == 0).then_some(StatusKind::Sleep),
            }
        }
        StatusKind::Freeze => {
            if rng.chance(FREEZE_THAW_CHANCE, "Freeze Thaw Check") {
                combatant.status = None;
                PreActionCheck {
                    prevented: None,
                    cured: Some(StatusKind::Freeze),
                }
            } else {
                PreActionCheck {
                    prevented: Some(ActionFailureReason::IsFrozen),
                    cured: None,
                }
            }
        }
        StatusKind::Paralysis => {
            let prevented = rng
                .chance(PARALYSIS_FULL_STOP_CHANCE, "Paralysis Check")
                .then_some(ActionFailureReason::IsParalyzed);
            PreActionCheck {
                prevented,
                cured: None,
            }
        }
        StatusKind::Burn | StatusKind::Poison | StatusKind::BadlyPoisoned => {
            PreActionCheck::default()
        }
    }
}

/// Apply end-of-turn status damage, if the status deals any.
pub fn apply_residual_damage(combatant: &mut Combatant) -> Option<ResidualTick> {
    if combatant.is_fainted() {
        return None;
    }
    let status = combatant.status?;
    let max_hp = combatant.max_hp();

    let damage = match status.kind {
        StatusKind::Burn => max_hp / 16,
        StatusKind::Poison => max_hp / 8,
        StatusKind::BadlyPoisoned => {
            let ticks = status.counter.saturating_add(1);
            combatant.status = Some(StatusCondition {
                kind: StatusKind::BadlyPoisoned,
                counter: ticks,
            });
            (max_hp / 16).saturating_mul(ticks as u16)
        }
        StatusKind::Sleep | StatusKind::Freeze | StatusKind::Paralysis => return None,
    }
    .max(1);

    let fainted = combatant.take_damage(damage);
    Some(ResidualTick {
        kind: status.kind,
        damage,
        fainted,
    })
}

/// Roll a move's ailment against its target. Only lands on a healthy,
/// status-free target; returns the condition that was applied.
pub fn try_inflict(
    target: &mut Combatant,
    ailment: Ailment,
    rng: &mut dyn BattleRng,
) -> Option<StatusCondition> {
    if target.is_fainted() || target.status.is_some() {
        return None;
    }
    if !rng.chance(ailment.chance as f64 / 100.0, "Ailment Chance") {
        return None;
    }

    let condition = match ailment.status {
        StatusKind::Sleep => {
            let turns = rng.range_inclusive(SLEEP_MIN_TURNS, SLEEP_MAX_TURNS, "Sleep Duration");
            StatusCondition::asleep(turns as u8)
        }
        kind => StatusCondition::new(kind),
    };
    target.status = Some(condition);
    Some(condition)
}
