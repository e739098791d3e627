//! Explicit registry of live battles, keyed by session handle and by owner.
//!
//! A session is created when a challenge is opened and removed as soon as
//! it reaches a terminal state, at which point its rewards are applied.

use crate::battle::ai::Behavior;
use crate::battle::engine::TurnOutcome;
use crate::battle::runner::BattleRunner;
use crate::battle::state::{BattleEvent, BattleState};
use crate::config::BattleRules;
use crate::errors::{BattleResult, SessionError, SessionResult};
use crate::pokemon::Combatant;
use crate::progression::ProgressionTracker;
use crate::rewards::{distribute_rewards, RewardPlan, RewardReport, RewardSink};
use crate::rng::BattleRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "battle-{}", self.0)
    }
}

/// Result of one submitted move. `rewards` is set on the turn the battle ended.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub outcome: TurnOutcome,
    pub rewards: Option<RewardReport>,
}

/// Challenge description used to open a session.
#[derive(Debug)]
pub struct Challenge {
    pub defender_label: String,
    pub defender_team: Vec<Combatant>,
    pub policy: Box<dyn Behavior>,
    pub plan: RewardPlan,
}

#[derive(Debug)]
pub struct SessionRegistry<S: RewardSink> {
    sessions: HashMap<SessionId, BattleRunner>,
    by_owner: HashMap<String, SessionId>,
    next_id: u64,
    progression: ProgressionTracker,
    sink: S,
    rules: BattleRules,
}

impl<S: RewardSink> SessionRegistry<S> {
    pub fn new(sink: S, rules: BattleRules) -> Self {
        Self::with_progression(sink, rules, ProgressionTracker::new())
    }

    pub fn with_progression(sink: S, rules: BattleRules, progression: ProgressionTracker) -> Self {
        Self {
            sessions: HashMap::new(),
            by_owner: HashMap::new(),
            next_id: 1,
            progression,
            sink,
            rules,
        }
    }

    /// Open a session against a known opponent. The owner picks a roster later.
    pub fn open_challenge(
        &mut self,
        owner: &str,
        challenge: Challenge,
    ) -> SessionResult<SessionId> {
        if self.by_owner.contains_key(owner) {
            warn!(owner, "owner already has an active battle");
            return Err(SessionError::OwnerAlreadyInBattle(owner.to_string()));
        }

        let id = SessionId(self.next_id);
        let state = BattleState::pending(
            id.to_string(),
            challenge.defender_label,
            challenge.defender_team,
            &self.rules,
        )?;
        self.next_id += 1;

        self.sessions.insert(
            id,
            BattleRunner::new(owner, state, challenge.policy, challenge.plan),
        );
        self.by_owner.insert(owner.to_string(), id);
        info!(owner, session = %id, "challenge opened");
        Ok(id)
    }

    /// Commit the owner's roster, starting the battle.
    pub fn select_roster(
        &mut self,
        id: SessionId,
        attacker_label: impl Into<String>,
        attacker_team: Vec<Combatant>,
    ) -> SessionResult<Vec<BattleEvent>> {
        self.runner_mut(id)?
            .commit_selection(attacker_label, attacker_team)
    }

    /// Open a challenge and commit the owner's roster in one step.
    /// Nothing is registered if either step fails.
    pub fn start_battle(
        &mut self,
        owner: &str,
        attacker_label: impl Into<String>,
        attacker_team: Vec<Combatant>,
        challenge: Challenge,
    ) -> SessionResult<SessionId> {
        let id = self.open_challenge(owner, challenge)?;
        if let Err(err) = self.select_roster(id, attacker_label, attacker_team) {
            self.remove(id);
            return Err(err);
        }
        Ok(id)
    }

    /// Submit the owner's move. When the turn ends the battle, the session is
    /// removed and rewards are applied.
    pub fn submit_move(
        &mut self,
        id: SessionId,
        move_index: usize,
        rng: &mut dyn BattleRng,
    ) -> BattleResult<TurnReport> {
        let rules = self.rules.clone();
        let runner = self.runner_mut(id)?;
        let outcome = runner.submit_move(move_index, &rules, rng)?;

        let rewards = if outcome.game_state.is_terminal() {
            self.finalize(id)
        } else {
            None
        };

        Ok(TurnReport { outcome, rewards })
    }

    /// Leave a battle. Forfeits rewards; the outcome is still recorded.
    pub fn abandon(&mut self, id: SessionId) -> BattleResult<RewardReport> {
        self.runner_mut(id)?.abandon()?;
        self.finalize(id)
            .ok_or_else(|| SessionError::UnknownSession(id.0).into())
    }

    pub fn session(&self, id: SessionId) -> Option<&BattleState> {
        self.sessions.get(&id).map(BattleRunner::state)
    }

    pub fn session_for_owner(&self, owner: &str) -> Option<SessionId> {
        self.by_owner.get(owner).copied()
    }

    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn progression(&self) -> &ProgressionTracker {
        &self.progression
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn rules(&self) -> &BattleRules {
        &self.rules
    }

    fn runner_mut(&mut self, id: SessionId) -> SessionResult<&mut BattleRunner> {
        self.sessions
            .get_mut(&id)
            .ok_or(SessionError::UnknownSession(id.0))
    }

    fn remove(&mut self, id: SessionId) -> Option<BattleRunner> {
        let runner = self.sessions.remove(&id)?;
        self.by_owner.remove(runner.owner());
        Some(runner)
    }

    fn finalize(&mut self, id: SessionId) -> Option<RewardReport> {
        let runner = self.remove(id)?;
        let outcome = runner.state().terminal_outcome();
        Some(distribute_rewards(
            runner.owner(),
            outcome,
            runner.plan(),
            &self.rules,
            &mut self.progression,
            &mut self.sink,
        ))
    }
}
