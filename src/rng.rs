//! Injectable randomness for battles, loot and quests.
//!
//! Every random draw in the engine goes through [`BattleRng`] with a short
//! reason string, so a scripted source can reproduce exact rolls and report
//! which roll it ran out on.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait BattleRng {
    /// A uniform draw in `[0, 1)`.
    fn next_unit(&mut self, reason: &str) -> f64;

    /// A uniform integer in `1..=100`.
    fn roll_percent(&mut self, reason: &str) -> u8 {
        let roll = (self.next_unit(reason) * 100.0).floor() as u8 + 1;
        roll.min(100)
    }

    /// True with probability `probability`.
    fn chance(&mut self, probability: f64, reason: &str) -> bool {
        self.next_unit(reason) < probability
    }

    /// A uniform integer in `low..=high`. Bounds are swapped if reversed.
    fn range_inclusive(&mut self, low: u32, high: u32, reason: &str) -> u32 {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        let span = (high - low) as f64 + 1.0;
        let offset = (self.next_unit(reason) * span).floor() as u32;
        (low + offset).min(high)
    }

    /// A uniform float in `[low, high)`.
    fn uniform(&mut self, low: f64, high: f64, reason: &str) -> f64 {
        low + self.next_unit(reason) * (high - low)
    }

    /// A uniform index into a collection of `len` items.
    fn pick(&mut self, len: usize, reason: &str) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let index = (self.next_unit(reason) * len as f64).floor() as usize;
        Some(index.min(len - 1))
    }
}

/// Seedable production source backed by `StdRng`.
#[derive(Debug, Clone)]
pub struct SeededRng {
    inner: StdRng,
}

impl SeededRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_os_rng(),
        }
    }
}

impl BattleRng for SeededRng {
    fn next_unit(&mut self, _reason: &str) -> f64 {
        self.inner.random::<f64>()
    }
}

/// Replays a fixed list of unit draws, in order.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    outcomes: Vec<f64>,
    index: usize,
}

impl ScriptedRng {
    pub fn new(outcomes: Vec<f64>) -> Self {
        Self { outcomes, index: 0 }
    }

    /// Builds a source whose `roll_percent` calls return exactly these values.
    pub fn from_percents(rolls: &[u8]) -> Self {
        let outcomes = rolls
            .iter()
            .map(|&roll| (roll.clamp(1, 100) as f64 - 0.5) / 100.0)
            .collect();
        Self::new(outcomes)
    }

    pub fn remaining(&self) -> usize {
        self.outcomes.len() - self.index
    }
}

impl BattleRng for ScriptedRng {
    fn next_unit(&mut self, reason: &str) -> f64 {
        if self.index >= self.outcomes.len() {
            panic!(
                "ScriptedRng exhausted! Tried to get a value for: '{}'. Need more random values.",
                reason
            );
        }
        let outcome = self.outcomes[self.index];

        #[cfg(test)]
        println!("[RNG] Consumed {} for: {}", outcome, reason);

        self.index += 1;
        outcome
    }
}
