use crate::battle::calculators::resolve_hit;
use crate::battle::conditions::{apply_residual_damage, check_action_prevention, try_inflict};
use crate::battle::state::{BattleEvent, BattleState, EventBus, GameState, Side};
use crate::battle::stats::effective_speed;
use crate::config::BattleRules;
use crate::errors::{ActionError, ActionResult};
use crate::pokemon::Combatant;
use crate::rng::BattleRng;
use schema::{EffectTarget, MoveData};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Everything that happened during one resolved turn.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub turn_number: u32,
    pub events: Vec<BattleEvent>,
    pub game_state: GameState,
}

/// Check that `side` may use the move at `move_index` right now.
pub fn validate_move(state: &BattleState, side: Side, move_index: usize) -> ActionResult<()> {
    if state.game_state != GameState::InProgress {
        return Err(ActionError::NotInProgress(state.game_state));
    }
    let active = state
        .active(side)
        .filter(|combatant| !combatant.is_fainted())
        .ok_or(ActionError::NoActiveCombatant(side.label()))?;

    if move_index >= active.moves.len() {
        return Err(ActionError::InvalidMoveIndex {
            index: move_index,
            available: active.moves.len(),
        });
    }
    Ok(())
}

/// Sides in acting order. The attacker side wins speed ties.
pub fn determine_action_order(state: &BattleState) -> [Side; 2] {
    let attacker_speed = state.active(Side::Attacker).map_or(0, effective_speed);
    let defender_speed = state.active(Side::Defender).map_or(0, effective_speed);

    if attacker_speed >= defender_speed {
        [Side::Attacker, Side::Defender]
    } else {
        [Side::Defender, Side::Attacker]
    }
}

/// Main entry point for turn resolution.
///
/// Both move indices are validated before anything changes; a rejected
/// turn leaves the state untouched.
pub fn resolve_turn(
    battle_state: &mut BattleState,
    attacker_move: usize,
    defender_move: usize,
    rules: &BattleRules,
    rng: &mut dyn BattleRng,
) -> ActionResult<TurnOutcome> {
    if let Err(err) = validate_move(battle_state, Side::Attacker, attacker_move)
        .and_then(|_| validate_move(battle_state, Side::Defender, defender_move))
    {
        warn!(battle_id = %battle_state.battle_id, error = %err, "rejected turn");
        return Err(err);
    }

    let mut bus = EventBus::new();

    // 1. Initialization
    battle_state.turn_number += 1;
    bus.push(BattleEvent::TurnStarted {
        turn_number: battle_state.turn_number,
    });

    // 2. Moves, fastest first. A side whose active combatant fainted this turn does not act.
    let order = determine_action_order(battle_state);
    for side in order {
        let can_act = battle_state
            .active(side)
            .is_some_and(|combatant| !combatant.is_fainted());
        let target_standing = battle_state
            .active(side.opponent())
            .is_some_and(|combatant| !combatant.is_fainted());
        if !can_act || !target_standing {
            continue;
        }

        let move_index = match side {
            Side::Attacker => attacker_move,
            Side::Defender => defender_move,
        };
        execute_move(battle_state, side, move_index, rules, rng, &mut bus);
    }

    // 3. End-of-turn residual damage
    execute_end_turn_phase(battle_state, order, &mut bus);

    // 4. Faints, replacements and win conditions
    resolve_faints(battle_state, &mut bus);

    if !battle_state.game_state.is_terminal() {
        bus.push(BattleEvent::TurnEnded);
    }

    let events = bus.into_events();
    debug!(
        battle_id = %battle_state.battle_id,
        turn = battle_state.turn_number,
        events = events.len(),
        state = ?battle_state.game_state,
        "turn resolved"
    );
    for event in &events {
        // BattleEnded is already logged by the state transition
        if !matches!(event, BattleEvent::BattleEnded { .. }) {
            battle_state.log.push(event.clone());
        }
    }

    Ok(TurnOutcome {
        turn_number: battle_state.turn_number,
        events,
        game_state: battle_state.game_state,
    })
}

/// Resolve one side's move: status check, hit resolution, then effects.
fn execute_move(
    battle_state: &mut BattleState,
    side: Side,
    move_index: usize,
    rules: &BattleRules,
    rng: &mut dyn BattleRng,
    bus: &mut EventBus,
) {
    let Some((attacker, defender)) = battle_state.active_pair_mut(side) else {
        return;
    };

    // Pre-action status check
    let check = check_action_prevention(attacker, rng);
    if let Some(reason) = check.prevented {
        bus.push(BattleEvent::ActionPrevented {
            pokemon: attacker.name.clone(),
            reason,
        });
    }
    if let Some(status) = check.cured {
        bus.push(BattleEvent::StatusCured {
            target: attacker.name.clone(),
            status,
        });
    }
    if check.prevented.is_some() {
        return;
    }

    let Some(move_data) = attacker.moves.get(move_index).cloned() else {
        return;
    };

    bus.push(BattleEvent::MoveUsed {
        side,
        pokemon: attacker.name.clone(),
        move_name: move_data.name.clone(),
    });

    let outcome = resolve_hit(&move_data, attacker, defender, rules, rng);
    if !outcome.hit {
        bus.push(BattleEvent::MoveMissed {
            side,
            pokemon: attacker.name.clone(),
        });
        return;
    }

    if move_data.is_status() {
        apply_move_effects(&move_data, attacker, defender, rng, bus);
        return;
    }

    bus.push(BattleEvent::MoveHit {
        side,
        pokemon: attacker.name.clone(),
    });
    if outcome.is_critical {
        bus.push(BattleEvent::CriticalHit);
    }
    bus.push(BattleEvent::AttackTypeEffectiveness {
        multiplier: outcome.effectiveness,
    });

    if outcome.effectiveness == 0.0 {
        return;
    }

    let fainted = defender.take_damage(outcome.damage);
    bus.push(BattleEvent::DamageDealt {
        target: defender.name.clone(),
        damage: outcome.damage,
        remaining_hp: defender.current_hp(),
    });

    if fainted {
        bus.push(BattleEvent::PokemonFainted {
            side: side.opponent(),
            pokemon: defender.name.clone(),
        });
        return;
    }

    apply_move_effects(&move_data, attacker, defender, rng, bus);
}

/// Stat-stage changes and ailments carried by a move that landed.
fn apply_move_effects(
    move_data: &MoveData,
    attacker: &mut Combatant,
    defender: &mut Combatant,
    rng: &mut dyn BattleRng,
    bus: &mut EventBus,
) {
    for change in &move_data.stat_changes {
        let target = match change.target {
            EffectTarget::User => &mut *attacker,
            EffectTarget::Opponent => &mut *defender,
        };
        let result = target.stages.adjust(change.stat, change.stages);

        if result.was_blocked() {
            bus.push(BattleEvent::StatChangeBlocked {
                target: target.name.clone(),
                stat: change.stat,
                rising: change.stages > 0,
            });
        } else {
            bus.push(BattleEvent::StatStageChanged {
                target: target.name.clone(),
                stat: change.stat,
                old_stage: result.old_stage,
                new_stage: result.new_stage,
            });
        }
    }

    if let Some(ailment) = move_data.ailment {
        if let Some(applied) = try_inflict(defender, ailment, rng) {
            bus.push(BattleEvent::StatusApplied {
                target: defender.name.clone(),
                status: applied.kind,
            });
        }
    }
}

/// Burn and poison damage for every combatant still standing, in acting order.
pub fn execute_end_turn_phase(
    battle_state: &mut BattleState,
    order: [Side; 2],
    bus: &mut EventBus,
) {
    for side in order {
        let Some(combatant) = battle_state.side_mut(side).active_mut() else {
            continue;
        };
        let Some(tick) = apply_residual_damage(combatant) else {
            continue;
        };

        bus.push(BattleEvent::StatusDamage {
            target: combatant.name.clone(),
            status: tick.kind,
            damage: tick.damage,
            remaining_hp: combatant.current_hp(),
        });
        if tick.fainted {
            bus.push(BattleEvent::PokemonFainted {
                side,
                pokemon: combatant.name.clone(),
            });
        }
    }
}

/// End the battle if a side is out of combatants, otherwise send in replacements.
/// An attacker side wipe is checked first, so a double knockout is a defeat.
fn resolve_faints(battle_state: &mut BattleState, bus: &mut EventBus) {
    if battle_state.side(Side::Attacker).is_defeated() {
        bus.push(battle_state.finish(GameState::Defeat));
        return;
    }
    if battle_state.side(Side::Defender).is_defeated() {
        bus.push(battle_state.finish(GameState::Victory));
        return;
    }

    for side in [Side::Attacker, Side::Defender] {
        let needs_replacement = battle_state
            .active(side)
            .is_some_and(Combatant::is_fainted);
        if !needs_replacement {
            continue;
        }
        let Some(next) = battle_state.side(side).next_available() else {
            continue;
        };
        if let Some(incoming) = battle_state.side_mut(side).switch_to(next) {
            debug!(side = side.label(), pokemon = %incoming.name, "switched in");
            bus.push(BattleEvent::SwitchedIn {
                side,
                pokemon: incoming.name.clone(),
            });
        }
    }
}
