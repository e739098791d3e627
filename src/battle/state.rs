use crate::config::BattleRules;
use crate::errors::{SessionError, SessionResult};
use crate::pokemon::Combatant;
use schema::{SpeciesId, StatType, StatusKind};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::info;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Copy)]
pub enum GameState {
    SelectionPending, // Defender is known, attacker has not committed a roster
    InProgress,
    Victory, // Attacker side won
    Defeat,  // Attacker side was wiped out
    Fled,
}

impl GameState {
    pub fn is_terminal(self) -> bool {
        matches!(self, GameState::Victory | GameState::Defeat | GameState::Fled)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Attacker,
    Defender,
}

impl Side {
    pub fn index(self) -> usize {
        match self {
            Side::Attacker => 0,
            Side::Defender => 1,
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::Attacker => Side::Defender,
            Side::Defender => Side::Attacker,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::Attacker => "attacker",
            Side::Defender => "defender",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionFailureReason {
    IsAsleep,
    IsFrozen,
    IsParalyzed,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Turn Management
    TurnStarted {
        turn_number: u32,
    },
    TurnEnded,

    // Combatants entering the field
    SwitchedIn {
        side: Side,
        pokemon: String,
    },

    // Move resolution
    MoveUsed {
        side: Side,
        pokemon: String,
        move_name: String,
    },
    MoveMissed {
        side: Side,
        pokemon: String,
    },
    MoveHit {
        side: Side,
        pokemon: String,
    },
    CriticalHit,
    AttackTypeEffectiveness {
        multiplier: f64,
    },
    DamageDealt {
        target: String,
        damage: u16,
        remaining_hp: u16,
    },
    PokemonFainted {
        side: Side,
        pokemon: String,
    },

    // Stat Changes
    StatStageChanged {
        target: String,
        stat: StatType,
        old_stage: i8,
        new_stage: i8,
    },
    StatChangeBlocked {
        target: String,
        stat: StatType,
        rising: bool,
    },

    // Status conditions
    StatusApplied {
        target: String,
        status: StatusKind,
    },
    StatusDamage {
        target: String,
        status: StatusKind,
        damage: u16,
        remaining_hp: u16,
    },
    StatusCured {
        target: String,
        status: StatusKind,
    },
    ActionPrevented {
        pokemon: String,
        reason: ActionFailureReason,
    },

    // Battle End
    BattleEnded {
        result: GameState,
    },
}

impl BattleEvent {
    /// Events that never produce user-visible text.
    pub fn is_silent(&self) -> bool {
        match self {
            BattleEvent::TurnEnded | BattleEvent::MoveHit { .. } => true,
            BattleEvent::AttackTypeEffectiveness { multiplier } => *multiplier == 1.0,
            _ => false,
        }
    }

    /// Formats the event into a human-readable string using battle context.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self, battle_state: &BattleState) -> Option<String> {
        if self.is_silent() {
            return None;
        }

        match self {
            // === Turn Management Events ===
            BattleEvent::TurnStarted { turn_number } => {
                Some(format!("=== Turn {} ===", turn_number))
            }
            BattleEvent::TurnEnded => None,

            BattleEvent::SwitchedIn { side, pokemon } => Some(format!(
                "{} sent out {}!",
                battle_state.side(*side).label,
                pokemon
            )),

            // === Move Events ===
            BattleEvent::MoveUsed {
                side,
                pokemon,
                move_name,
            } => Some(format!(
                "{}'s {} used {}!",
                battle_state.side(*side).label,
                pokemon,
                move_name
            )),
            BattleEvent::MoveMissed { pokemon, .. } => {
                Some(format!("{}'s attack missed!", pokemon))
            }
            BattleEvent::MoveHit { .. } => None,
            BattleEvent::CriticalHit => Some("A critical hit!".to_string()),
            BattleEvent::AttackTypeEffectiveness { multiplier } => match *multiplier {
                m if m > 1.0 => Some("It's super effective!".to_string()),
                m if m < 1.0 && m > 0.0 => Some("It's not very effective...".to_string()),
                0.0 => Some("It had no effect!".to_string()),
                _ => None,
            },
            BattleEvent::DamageDealt { target, damage, .. } => {
                Some(format!("{} took {} damage!", target, damage))
            }
            BattleEvent::PokemonFainted { pokemon, .. } => Some(format!("{} fainted!", pokemon)),

            // === Stat Change Events ===
            BattleEvent::StatStageChanged {
                target,
                stat,
                old_stage,
                new_stage,
            } => {
                let verb = match (new_stage - old_stage).abs() {
                    1 => "",
                    2 => " sharply",
                    _ => " drastically",
                };
                let direction = if new_stage > old_stage { "rose" } else { "fell" };
                Some(format!("{}'s {}{} {}!", target, stat, verb, direction))
            }
            BattleEvent::StatChangeBlocked {
                target,
                stat,
                rising,
            } => {
                let direction = if *rising { "higher" } else { "lower" };
                Some(format!("{}'s {} won't go any {}!", target, stat, direction))
            }

            // === Status Events ===
            BattleEvent::StatusApplied { target, status } => Some(format!(
                "{} {}",
                target,
                Self::format_status_applied(*status)
            )),
            BattleEvent::StatusDamage {
                target,
                status,
                damage,
                ..
            } => Some(format!(
                "{} is hurt by its {}! ({} damage)",
                target, status, damage
            )),
            BattleEvent::StatusCured { target, status } => Some(match status {
                StatusKind::Sleep => format!("{} woke up!", target),
                StatusKind::Freeze => format!("{} thawed out!", target),
                other => format!("{} was cured of its {}!", target, other),
            }),
            BattleEvent::ActionPrevented { pokemon, reason } => Some(format!(
                "{} {}",
                pokemon,
                Self::format_action_failure_reason(*reason)
            )),

            // === Battle End Events ===
            BattleEvent::BattleEnded { result } => Some(match result {
                GameState::Victory => format!(
                    "{} defeated {}!",
                    battle_state.side(Side::Attacker).label,
                    battle_state.side(Side::Defender).label
                ),
                GameState::Defeat => format!(
                    "{} is out of usable Pokemon!",
                    battle_state.side(Side::Attacker).label
                ),
                GameState::Fled => "Got away safely!".to_string(),
                GameState::SelectionPending | GameState::InProgress => {
                    "The battle was interrupted.".to_string()
                }
            }),
        }
    }

    fn format_status_applied(status: StatusKind) -> &'static str {
        match status {
            StatusKind::Sleep => "fell asleep!",
            StatusKind::Poison => "was poisoned!",
            StatusKind::BadlyPoisoned => "was badly poisoned!",
            StatusKind::Burn => "was burned!",
            StatusKind::Freeze => "was frozen solid!",
            StatusKind::Paralysis => "is paralyzed! It may be unable to move!",
        }
    }

    fn format_action_failure_reason(reason: ActionFailureReason) -> &'static str {
        match reason {
            ActionFailureReason::IsAsleep => "is fast asleep.",
            ActionFailureReason::IsFrozen => "is frozen solid!",
            ActionFailureReason::IsParalyzed => "is fully paralyzed!",
        }
    }
}

/// Event bus for collecting the events of a single turn.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<BattleEvent> {
        self.events
    }

    /// Return true if the event bus contains no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Return the number of events in the bus.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl std::fmt::Display for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}

/// Bounded history of a session's events; the oldest entries drop off first.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattleLog {
    entries: VecDeque<BattleEvent>,
    capacity: usize,
    keep_silent: bool,
}

impl BattleLog {
    pub fn new(capacity: usize, keep_silent: bool) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            keep_silent,
        }
    }

    pub fn push(&mut self, event: BattleEvent) {
        if self.capacity == 0 || (!self.keep_silent && event.is_silent()) {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(event);
    }

    pub fn extend<'a>(&mut self, events: impl IntoIterator<Item = &'a BattleEvent>) {
        for event in events {
            self.push(event.clone());
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &BattleEvent> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One side of the field: its roster and which member is out.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattleSide {
    pub label: String,
    pub team: Vec<Combatant>,
    pub active_index: usize,
    /// Team indices that have been sent out at least once, in order.
    pub participated: Vec<usize>,
}

impl BattleSide {
    pub fn new(label: impl Into<String>, team: Vec<Combatant>) -> Self {
        let participated = if team.is_empty() { Vec::new() } else { vec![0] };
        Self {
            label: label.into(),
            team,
            active_index: 0,
            participated,
        }
    }

    pub fn active(&self) -> Option<&Combatant> {
        self.team.get(self.active_index)
    }

    pub fn active_mut(&mut self) -> Option<&mut Combatant> {
        self.team.get_mut(self.active_index)
    }

    /// First team member that can still fight, other than the active one.
    pub fn next_available(&self) -> Option<usize> {
        self.team
            .iter()
            .enumerate()
            .find(|(index, member)| *index != self.active_index && !member.is_fainted())
            .map(|(index, _)| index)
    }

    pub fn is_defeated(&self) -> bool {
        self.team.iter().all(Combatant::is_fainted)
    }

    pub fn fainted_count(&self) -> usize {
        self.team.iter().filter(|member| member.is_fainted()).count()
    }

    /// Make `index` the active member, clearing its stages and status.
    pub fn switch_to(&mut self, index: usize) -> Option<&Combatant> {
        let member = self.team.get_mut(index)?;
        member.reset_on_switch_in();
        self.active_index = index;
        if !self.participated.contains(&index) {
            self.participated.push(index);
        }
        self.team.get(index)
    }
}

/// What a caller learns when a session reaches a terminal state.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TerminalOutcome {
    pub battle_id: String,
    pub result: GameState,
    pub turns: u32,
    /// Attacker-side species that took the field, without duplicates.
    pub participants: Vec<SpeciesId>,
    pub opponents_defeated: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattleState {
    pub battle_id: String,
    pub sides: [BattleSide; 2],
    pub turn_number: u32,
    pub game_state: GameState,
    pub log: BattleLog,
}

impl BattleState {
    /// Open a session against a known defender, waiting for the attacker's roster.
    pub fn pending(
        battle_id: impl Into<String>,
        defender_label: impl Into<String>,
        defender_team: Vec<Combatant>,
        rules: &BattleRules,
    ) -> SessionResult<Self> {
        if defender_team.is_empty() {
            return Err(SessionError::EmptyRoster(Side::Defender.label()));
        }

        Ok(Self {
            battle_id: battle_id.into(),
            sides: [
                BattleSide::new(String::new(), Vec::new()),
                BattleSide::new(defender_label, defender_team),
            ],
            turn_number: 0,
            game_state: GameState::SelectionPending,
            log: BattleLog::new(rules.log_capacity, rules.keep_silent_events),
        })
    }

    /// Open a session with both rosters known, ready for the first turn.
    pub fn new(
        battle_id: impl Into<String>,
        attacker_label: impl Into<String>,
        attacker_team: Vec<Combatant>,
        defender_label: impl Into<String>,
        defender_team: Vec<Combatant>,
        rules: &BattleRules,
    ) -> SessionResult<Self> {
        let mut state = Self::pending(battle_id, defender_label, defender_team, rules)?;
        state.commit_selection(attacker_label, attacker_team)?;
        Ok(state)
    }

    /// Commit the attacker roster and move the session to `InProgress`.
    pub fn commit_selection(
        &mut self,
        attacker_label: impl Into<String>,
        attacker_team: Vec<Combatant>,
    ) -> SessionResult<Vec<BattleEvent>> {
        if self.game_state != GameState::SelectionPending {
            return Err(SessionError::NotAwaitingSelection(self.game_state));
        }
        if attacker_team.is_empty() {
            return Err(SessionError::EmptyRoster(Side::Attacker.label()));
        }

        self.sides[Side::Attacker.index()] = BattleSide::new(attacker_label, attacker_team);
        self.game_state = GameState::InProgress;

        let events: Vec<BattleEvent> = [Side::Attacker, Side::Defender]
            .into_iter()
            .filter_map(|side| {
                self.active(side).map(|lead| BattleEvent::SwitchedIn {
                    side,
                    pokemon: lead.name.clone(),
                })
            })
            .collect();
        self.log.extend(&events);

        info!(
            battle_id = %self.battle_id,
            attacker = %self.side(Side::Attacker).label,
            defender = %self.side(Side::Defender).label,
            "battle started"
        );
        Ok(events)
    }

    /// Leave the battle. Reachable from any non-terminal state; forfeits rewards.
    pub fn abandon(&mut self) -> SessionResult<TerminalOutcome> {
        if self.game_state.is_terminal() {
            return Err(SessionError::AlreadyTerminal(self.game_state));
        }
        self.finish(GameState::Fled);
        Ok(self.terminal_outcome())
    }

    /// Move to a terminal state and record it.
    pub(crate) fn finish(&mut self, result: GameState) -> BattleEvent {
        self.game_state = result;
        let event = BattleEvent::BattleEnded { result };
        self.log.push(event.clone());
        info!(
            battle_id = %self.battle_id,
            result = ?result,
            turns = self.turn_number,
            "battle ended"
        );
        event
    }

    pub fn side(&self, side: Side) -> &BattleSide {
        &self.sides[side.index()]
    }

    pub fn side_mut(&mut self, side: Side) -> &mut BattleSide {
        &mut self.sides[side.index()]
    }

    pub fn active(&self, side: Side) -> Option<&Combatant> {
        self.side(side).active()
    }

    /// Mutable access to both active combatants at once, actor first.
    pub fn active_pair_mut(&mut self, actor: Side) -> Option<(&mut Combatant, &mut Combatant)> {
        let [attacker_side, defender_side] = &mut self.sides;
        let attacker = attacker_side.active_mut()?;
        let defender = defender_side.active_mut()?;
        match actor {
            Side::Attacker => Some((attacker, defender)),
            Side::Defender => Some((defender, attacker)),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.game_state.is_terminal()
    }

    pub fn terminal_outcome(&self) -> TerminalOutcome {
        let attacker = self.side(Side::Attacker);
        let mut participants: Vec<SpeciesId> = Vec::new();
        for &index in &attacker.participated {
            if let Some(member) = attacker.team.get(index) {
                if !participants.contains(&member.species) {
                    participants.push(member.species);
                }
            }
        }

        TerminalOutcome {
            battle_id: self.battle_id.clone(),
            result: self.game_state,
            turns: self.turn_number,
            participants,
            opponents_defeated: self.side(Side::Defender).fainted_count(),
        }
    }

    /// Human-readable lines for everything in the log.
    pub fn format_log(&self) -> Vec<String> {
        self.log
            .entries()
            .filter_map(|event| event.format(self))
            .collect()
    }

    /// Serialize the session so a host can park it between interactions.
    pub fn to_snapshot(&self) -> Result<Vec<u8>, postcard::Error> {
        postcard::to_allocvec(self)
    }

    pub fn from_snapshot(bytes: &[u8]) -> Result<Self, postcard::Error> {
        postcard::from_bytes(bytes)
    }
}

#[cfg(test)]
mod event_formatting_tests {
    use super::*;
    use crate::battle::tests::common::{create_test_session, TestCombatantBuilder};
    use pretty_assertions::assert_eq;

    fn create_test_battle_state() -> BattleState {
        create_test_session(
            TestCombatantBuilder::new(25, 25).build(),
            TestCombatantBuilder::new(4, 25).build(),
        )
    }

    #[test]
    fn test_silent_events_return_none() {
        let battle_state = create_test_battle_state();

        let silent_events = vec![
            BattleEvent::TurnEnded,
            BattleEvent::MoveHit {
                side: Side::Attacker,
                pokemon: "Pikachu".to_string(),
            },
            BattleEvent::AttackTypeEffectiveness { multiplier: 1.0 },
        ];

        for event in silent_events {
            assert!(
                event.format(&battle_state).is_none(),
                "Event {:?} should be silent but returned text",
                event
            );
        }
    }

    #[test]
    fn test_event_text_samples() {
        let battle_state = create_test_battle_state();

        assert_eq!(
            BattleEvent::TurnStarted { turn_number: 5 }.format(&battle_state),
            Some("=== Turn 5 ===".to_string())
        );
        assert_eq!(
            BattleEvent::MoveUsed {
                side: Side::Attacker,
                pokemon: "Pikachu".to_string(),
                move_name: "Thunder Shock".to_string(),
            }
            .format(&battle_state),
            Some("Player's Pikachu used Thunder Shock!".to_string())
        );
        assert_eq!(
            BattleEvent::AttackTypeEffectiveness { multiplier: 0.5 }.format(&battle_state),
            Some("It's not very effective...".to_string())
        );
        assert_eq!(
            BattleEvent::AttackTypeEffectiveness { multiplier: 0.0 }.format(&battle_state),
            Some("It had no effect!".to_string())
        );
        assert_eq!(
            BattleEvent::StatStageChanged {
                target: "Charmander".to_string(),
                stat: StatType::Attack,
                old_stage: 0,
                new_stage: -1,
            }
            .format(&battle_state),
            Some("Charmander's Attack fell!".to_string())
        );
        assert_eq!(
            BattleEvent::StatusCured {
                target: "Pikachu".to_string(),
                status: StatusKind::Sleep,
            }
            .format(&battle_state),
            Some("Pikachu woke up!".to_string())
        );
    }

    #[test]
    fn test_log_is_bounded_and_drops_oldest() {
        let mut log = BattleLog::new(3, false);
        for turn_number in 1..=5 {
            log.push(BattleEvent::TurnStarted { turn_number });
            log.push(BattleEvent::TurnEnded);
        }

        let kept: Vec<&BattleEvent> = log.entries().collect();
        assert_eq!(
            kept,
            vec![
                &BattleEvent::TurnStarted { turn_number: 3 },
                &BattleEvent::TurnStarted { turn_number: 4 },
                &BattleEvent::TurnStarted { turn_number: 5 },
            ]
        );
    }

    #[test]
    fn test_log_keeps_silent_events_when_configured() {
        let mut log = BattleLog::new(4, true);
        log.push(BattleEvent::TurnEnded);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_snapshot_restores_identical_state() {
        let battle_state = create_test_battle_state();

        let bytes = battle_state
            .to_snapshot()
            .unwrap_or_else(|err| panic!("snapshot failed: {err}"));
        let restored = BattleState::from_snapshot(&bytes)
            .unwrap_or_else(|err| panic!("restore failed: {err}"));

        assert_eq!(restored, battle_state);
    }

    #[test]
    fn test_commit_selection_requires_pending_state() {
        let mut battle_state = create_test_battle_state();
        let result =
            battle_state.commit_selection("Late", vec![TestCombatantBuilder::new(7, 5).build()]);
        assert_eq!(
            result,
            Err(SessionError::NotAwaitingSelection(GameState::InProgress))
        );
    }

    #[test]
    fn test_empty_rosters_are_rejected() {
        let rules = BattleRules::default();
        assert_eq!(
            BattleState::pending("b", "Nobody", vec![], &rules),
            Err(SessionError::EmptyRoster("defender"))
        );

        let mut pending = BattleState::pending(
            "b",
            "Youngster Joey",
            vec![TestCombatantBuilder::new(19, 5).build()],
            &rules,
        )
        .unwrap_or_else(|err| panic!("pending session should open: {err}"));
        assert_eq!(
            pending.commit_selection("Player", vec![]),
            Err(SessionError::EmptyRoster("attacker"))
        );
        assert_eq!(pending.game_state, GameState::SelectionPending);
    }
}
