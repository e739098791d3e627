use crate::battle::ai::Behavior;
use crate::battle::engine::{resolve_turn, validate_move, TurnOutcome};
use crate::battle::state::{BattleEvent, BattleState, GameState, Side, TerminalOutcome};
use crate::config::BattleRules;
use crate::errors::{ActionResult, BattleResult, SessionResult};
use crate::pokemon::Combatant;
use crate::rewards::RewardPlan;
use crate::rng::BattleRng;
use tracing::warn;

/// A session together with the policy driving its scripted side and what it pays out.
///
/// The attacker side is always the owner; the defender side always picks
/// its moves through `policy`.
#[derive(Debug)]
pub struct BattleRunner {
    owner: String,
    state: BattleState,
    policy: Box<dyn Behavior>,
    plan: RewardPlan,
}

impl BattleRunner {
    pub fn new(
        owner: impl Into<String>,
        state: BattleState,
        policy: Box<dyn Behavior>,
        plan: RewardPlan,
    ) -> Self {
        Self {
            owner: owner.into(),
            state,
            policy,
            plan,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn plan(&self) -> &RewardPlan {
        &self.plan
    }

    pub fn game_state(&self) -> GameState {
        self.state.game_state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn commit_selection(
        &mut self,
        attacker_label: impl Into<String>,
        attacker_team: Vec<Combatant>,
    ) -> SessionResult<Vec<BattleEvent>> {
        self.state.commit_selection(attacker_label, attacker_team)
    }

    /// Play the owner's move against the policy's reply.
    ///
    /// The owner's index is validated before the policy is consulted, so a
    /// rejected submission consumes no randomness and changes nothing.
    pub fn submit_move(
        &mut self,
        move_index: usize,
        rules: &BattleRules,
        rng: &mut dyn BattleRng,
    ) -> ActionResult<TurnOutcome> {
        validate_move(&self.state, Side::Attacker, move_index)?;

        let mut reply = self.policy.choose_move(&self.state, Side::Defender, rng);
        if validate_move(&self.state, Side::Defender, reply).is_err() {
            warn!(
                battle_id = %self.state.battle_id,
                policy = ?self.policy,
                reply,
                "policy chose an unusable move, using the first one"
            );
            reply = 0;
        }

        resolve_turn(&mut self.state, move_index, reply, rules, rng)
    }

    pub fn abandon(&mut self) -> SessionResult<TerminalOutcome> {
        self.state.abandon()
    }

    /// Let `attacker_policy` play the owner's side until the battle ends or
    /// `max_turns` have passed. A battle still running after `max_turns` is abandoned.
    pub fn run_to_completion(
        &mut self,
        attacker_policy: &mut dyn Behavior,
        rules: &BattleRules,
        rng: &mut dyn BattleRng,
        max_turns: u32,
    ) -> BattleResult<Vec<TurnOutcome>> {
        let mut turns = Vec::new();

        while !self.is_finished() && self.state.turn_number < max_turns {
            let choice = attacker_policy.choose_move(&self.state, Side::Attacker, rng);
            turns.push(self.submit_move(choice, rules, rng)?);
        }

        if !self.is_finished() {
            warn!(battle_id = %self.state.battle_id, max_turns, "turn limit reached");
            self.abandon()?;
        }

        Ok(turns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::ai::{ScoringAI, ScriptedAI};
    use crate::battle::tests::common::{
        create_test_session, move_named, predictable_rng, TestCombatantBuilder,
    };
    use crate::errors::{ActionError, SessionError};
    use crate::rng::{ScriptedRng, SeededRng};
    use pretty_assertions::assert_eq;

    fn runner(policy: Box<dyn Behavior>) -> BattleRunner {
        let pikachu = TestCombatantBuilder::new(25, 20)
            .with_moves(vec![move_named("Thunder Shock"), move_named("Growl")])
            .build();
        let magikarp = TestCombatantBuilder::new(129, 10).build();
        BattleRunner::new(
            "ash",
            create_test_session(pikachu, magikarp),
            policy,
            RewardPlan::default(),
        )
    }

    #[test]
    fn test_invalid_index_rejected_before_policy_runs() {
        let mut runner = runner(Box::new(ScriptedAI::always(0)));
        // An empty script would panic if the policy or engine rolled anything
        let mut rng = ScriptedRng::new(vec![]);
        let before = runner.state().clone();

        let result = runner.submit_move(7, &BattleRules::default(), &mut rng);

        assert_eq!(
            result,
            Err(ActionError::InvalidMoveIndex {
                index: 7,
                available: 2
            })
        );
        assert_eq!(runner.state(), &before);
    }

    #[test]
    fn test_unusable_policy_reply_falls_back_to_first_move() {
        let mut runner = runner(Box::new(ScriptedAI::always(3)));
        let mut rng = predictable_rng();

        let outcome = runner.submit_move(1, &BattleRules::default(), &mut rng);

        let outcome = outcome.unwrap_or_else(|err| panic!("turn should resolve: {err}"));
        assert!(outcome.events.iter().any(|event| matches!(
            event,
            BattleEvent::MoveUsed { side: Side::Defender, move_name, .. } if move_name == "Splash"
        )));
    }

    #[test]
    fn test_abandon_then_moves_are_rejected() {
        let mut runner = runner(Box::new(ScoringAI::new()));
        let mut rng = predictable_rng();

        let outcome = runner.abandon().unwrap_or_else(|err| panic!("abandon failed: {err}"));
        assert_eq!(outcome.result, GameState::Fled);

        assert_eq!(
            runner.submit_move(0, &BattleRules::default(), &mut rng),
            Err(ActionError::NotInProgress(GameState::Fled))
        );
        assert_eq!(
            runner.abandon(),
            Err(SessionError::AlreadyTerminal(GameState::Fled))
        );
    }

    #[test]
    fn test_run_to_completion_reaches_a_terminal_state() {
        let mut runner = runner(Box::new(ScoringAI::new()));
        let mut rng = SeededRng::from_seed(7);

        let turns = runner
            .run_to_completion(&mut ScoringAI::new(), &BattleRules::default(), &mut rng, 50)
            .unwrap_or_else(|err| panic!("battle should run: {err}"));

        assert!(runner.is_finished());
        assert!(!turns.is_empty());
        assert_eq!(runner.game_state(), GameState::Victory);
    }

    #[test]
    fn test_run_to_completion_abandons_at_turn_limit() {
        // Arrange: Growl against Splash never ends the battle
        let mut runner = runner(Box::new(ScriptedAI::always(0)));
        let mut rng = SeededRng::from_seed(7);

        // Act
        let turns = runner
            .run_to_completion(&mut ScriptedAI::always(1), &BattleRules::default(), &mut rng, 2)
            .unwrap_or_else(|err| panic!("battle should run: {err}"));

        // Assert
        assert_eq!(turns.len(), 2);
        assert_eq!(runner.game_state(), GameState::Fled);
        assert_eq!(
            runner.abandon(),
            Err(SessionError::AlreadyTerminal(GameState::Fled))
        );
    }
}
