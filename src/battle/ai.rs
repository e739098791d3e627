//! A module for defining AI behaviors for battle opponents.

use crate::battle::state::{BattleState, Side};
use crate::rng::BattleRng;
use ordered_float::OrderedFloat;
use schema::{EffectTarget, MoveData, PokemonType};
use std::collections::VecDeque;
use std::fmt;

/// A trait for any system that can decide which move a side uses.
/// This provides a common interface for different AI difficulties or strategies.
pub trait Behavior: fmt::Debug {
    /// Inspects the battle state and picks a move index for the given side's active combatant.
    fn choose_move(&mut self, state: &BattleState, side: Side, rng: &mut dyn BattleRng) -> usize;
}

/// Uniform random choice among the known moves.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomAI;

impl Behavior for RandomAI {
    fn choose_move(&mut self, state: &BattleState, side: Side, rng: &mut dyn BattleRng) -> usize {
        let known = state.active(side).map_or(0, |combatant| combatant.moves.len());
        rng.pick(known, "AI Move Choice").unwrap_or(0)
    }
}

/// Deterministic greedy policy: the move with the best expected value wins,
/// ties going to the lowest index.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringAI;

impl ScoringAI {
    pub fn new() -> Self {
        Self
    }

    /// The core scoring logic. Assigns a floating-point value to a given move.
    fn score_move(&self, move_data: &MoveData, state: &BattleState, side: Side) -> f64 {
        let (Some(attacker), Some(defender)) = (state.active(side), state.active(side.opponent()))
        else {
            return 0.0;
        };

        if move_data.is_status() {
            return Self::utility_score(move_data, state, side);
        }

        let effectiveness = PokemonType::effectiveness(move_data.move_type, &defender.types);
        let stab = if attacker.has_type(move_data.move_type) {
            1.5
        } else {
            1.0
        };

        move_data.power as f64 * effectiveness * stab * (move_data.accuracy as f64 / 100.0)
    }

    /// Status moves are only worth something while they can still change the board.
    fn utility_score(move_data: &MoveData, state: &BattleState, side: Side) -> f64 {
        let mut score = 0.0;

        for change in &move_data.stat_changes {
            let target_side = match change.target {
                EffectTarget::User => side,
                EffectTarget::Opponent => side.opponent(),
            };
            let Some(target) = state.active(target_side) else {
                continue;
            };
            let stage = target.stages.get(change.stat);
            let has_room = if change.stages > 0 { stage < 6 } else { stage > -6 };
            if has_room {
                score += 10.0 * change.stages.unsigned_abs() as f64;
            }
        }

        if let Some(ailment) = move_data.ailment {
            let target_is_healthy = state
                .active(side.opponent())
                .is_some_and(|defender| defender.status.is_none());
            if target_is_healthy {
                score += 45.0 * ailment.chance as f64 / 100.0;
            }
        }

        score * (move_data.accuracy as f64 / 100.0)
    }
}

impl Behavior for ScoringAI {
    fn choose_move(&mut self, state: &BattleState, side: Side, _rng: &mut dyn BattleRng) -> usize {
        let Some(active) = state.active(side) else {
            return 0;
        };

        active
            .moves
            .iter()
            .enumerate()
            .map(|(index, move_data)| {
                (index, OrderedFloat(self.score_move(move_data, state, side)))
            })
            .max_by(|(left_index, left), (right_index, right)| {
                left.cmp(right).then(right_index.cmp(left_index))
            })
            .map_or(0, |(index, _)| index)
    }
}

/// Replays a fixed queue of move indices, then repeats `fallback`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedAI {
    queue: VecDeque<usize>,
    fallback: usize,
}

impl ScriptedAI {
    pub fn new(moves: impl IntoIterator<Item = usize>) -> Self {
        Self {
            queue: moves.into_iter().collect(),
            fallback: 0,
        }
    }

    pub fn always(index: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            fallback: index,
        }
    }
}

impl Behavior for ScriptedAI {
    fn choose_move(
        &mut self,
        _state: &BattleState,
        _side: Side,
        _rng: &mut dyn BattleRng,
    ) -> usize {
        self.queue.pop_front().unwrap_or(self.fallback)
    }
}
