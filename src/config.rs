//! Engine-wide tunables, loadable from RON.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Numeric rules of battle resolution and bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleRules {
    pub critical_hit_chance: f64,
    pub critical_multiplier: f64,
    /// Lower bound of the uniform damage spread; the upper bound is 1.0.
    pub random_factor_floor: f64,
    pub stab_multiplier: f64,
    /// Number of events the per-session battle log retains.
    pub log_capacity: usize,
    pub xp_on_loss: u32,
    pub keep_silent_events: bool,
}

impl Default for BattleRules {
    fn default() -> Self {
        Self {
            critical_hit_chance: 0.0625,
            critical_multiplier: 1.5,
            random_factor_floor: 0.85,
            stab_multiplier: 1.5,
            log_capacity: 32,
            xp_on_loss: 0,
            keep_silent_events: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub rules: BattleRules,
}

impl EngineConfig {
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_ron_str(&text)?;
        debug!(path = %path.display(), "engine config loaded");
        Ok(config)
    }
}
