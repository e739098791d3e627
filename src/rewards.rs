//! Rewards handed out when a session reaches a terminal state.
//!
//! The engine computes what an owner earned and forwards it to a
//! [`RewardSink`]; persisting it is the sink's job. Sink failures are
//! collected into the report and never retried.

use crate::battle::state::{GameState, TerminalOutcome};
use crate::config::BattleRules;
use crate::errors::RewardSinkError;
use crate::progression::{LevelChange, ProgressionTracker};
use schema::SpeciesId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

/// Persistence collaborator for battle rewards.
pub trait RewardSink {
    fn record_battle_outcome(
        &mut self,
        owner: &str,
        outcome: &TerminalOutcome,
    ) -> Result<(), RewardSinkError>;
    fn add_currency(&mut self, owner: &str, amount: u32) -> Result<(), RewardSinkError>;
    fn add_catch(
        &mut self,
        owner: &str,
        species: SpeciesId,
        is_shiny: bool,
    ) -> Result<(), RewardSinkError>;
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatchReward {
    pub species: SpeciesId,
    pub is_shiny: bool,
}

/// What beating a particular opponent is worth.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RewardPlan {
    pub currency: u32,
    pub xp: u32,
    #[serde(default)]
    pub catch: Option<CatchReward>,
    /// Pack tier granted on victory; the host opens or stores it.
    #[serde(default)]
    pub pack: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpAward {
    pub species: SpeciesId,
    pub change: LevelChange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RewardReport {
    pub owner: String,
    pub outcome: TerminalOutcome,
    pub xp_awards: Vec<XpAward>,
    pub currency: u32,
    pub caught: Option<CatchReward>,
    pub pack: Option<String>,
    pub sink_errors: Vec<RewardSinkError>,
}

impl RewardReport {
    fn empty(owner: &str, outcome: TerminalOutcome) -> Self {
        Self {
            owner: owner.to_string(),
            outcome,
            xp_awards: Vec::new(),
            currency: 0,
            caught: None,
            pack: None,
            sink_errors: Vec::new(),
        }
    }

    pub fn leveled_up(&self) -> impl Iterator<Item = &XpAward> {
        self.xp_awards.iter().filter(|award| award.change.leveled_up)
    }
}

/// Apply the rewards for a finished session.
///
/// Victory awards shared XP to every attacker species that took the field,
/// pays the plan's currency and grants its catch. Defeat counts a loss and
/// awards `rules.xp_on_loss`. Fled only records the outcome.
pub fn distribute_rewards(
    owner: &str,
    outcome: TerminalOutcome,
    plan: &RewardPlan,
    rules: &BattleRules,
    tracker: &mut ProgressionTracker,
    sink: &mut dyn RewardSink,
) -> RewardReport {
    let mut report = RewardReport::empty(owner, outcome);

    match report.outcome.result {
        GameState::Victory => {
            report.xp_awards =
                award_xp(owner, &report.outcome.participants, plan.xp, true, tracker);

            if plan.currency > 0 {
                match sink.add_currency(owner, plan.currency) {
                    Ok(()) => report.currency = plan.currency,
                    Err(err) => report.sink_errors.push(err),
                }
            }
            if let Some(catch) = plan.catch {
                match sink.add_catch(owner, catch.species, catch.is_shiny) {
                    Ok(()) => report.caught = Some(catch),
                    Err(err) => report.sink_errors.push(err),
                }
            }
            report.pack = plan.pack.clone();
        }
        GameState::Defeat => {
            report.xp_awards =
                award_xp(owner, &report.outcome.participants, rules.xp_on_loss, false, tracker);
        }
        GameState::Fled | GameState::SelectionPending | GameState::InProgress => {}
    }

    if let Err(err) = sink.record_battle_outcome(owner, &report.outcome) {
        report.sink_errors.push(err);
    }

    for err in &report.sink_errors {
        warn!(owner, error = %err, "reward sink failed");
    }
    info!(
        owner,
        result = ?report.outcome.result,
        currency = report.currency,
        xp_awards = report.xp_awards.len(),
        "rewards distributed"
    );

    report
}

fn award_xp(
    owner: &str,
    participants: &[SpeciesId],
    amount: u32,
    is_win: bool,
    tracker: &mut ProgressionTracker,
) -> Vec<XpAward> {
    participants
        .iter()
        .map(|&species| XpAward {
            species,
            change: tracker.add_xp(owner, species, amount, is_win),
        })
        .collect()
}

/// In-memory sink that remembers everything it was given.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub outcomes: Vec<(String, TerminalOutcome)>,
    pub balances: HashMap<String, u64>,
    pub catches: Vec<(String, SpeciesId, bool)>,
    /// Operation name that should fail, for exercising error paths.
    pub fail_on: Option<&'static str>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(operation: &'static str) -> Self {
        Self {
            fail_on: Some(operation),
            ..Self::default()
        }
    }

    pub fn balance(&self, owner: &str) -> u64 {
        self.balances.get(owner).copied().unwrap_or(0)
    }

    fn check(&self, operation: &'static str) -> Result<(), RewardSinkError> {
        if self.fail_on == Some(operation) {
            return Err(RewardSinkError::new(operation, "storage unavailable"));
        }
        Ok(())
    }
}

impl RewardSink for RecordingSink {
    fn record_battle_outcome(
        &mut self,
        owner: &str,
        outcome: &TerminalOutcome,
    ) -> Result<(), RewardSinkError> {
        self.check("record_battle_outcome")?;
        self.outcomes.push((owner.to_string(), outcome.clone()));
        Ok(())
    }

    fn add_currency(&mut self, owner: &str, amount: u32) -> Result<(), RewardSinkError> {
        self.check("add_currency")?;
        *self.balances.entry(owner.to_string()).or_default() += amount as u64;
        Ok(())
    }

    fn add_catch(
        &mut self,
        owner: &str,
        species: SpeciesId,
        is_shiny: bool,
    ) -> Result<(), RewardSinkError> {
        self.check("add_catch")?;
        self.catches.push((owner.to_string(), species, is_shiny));
        Ok(())
    }
}
