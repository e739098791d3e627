#[cfg(test)]
mod tests {
    use crate::battle::engine::resolve_turn;
    use crate::battle::state::{ActionFailureReason, BattleEvent, BattleState, Side};
    use crate::battle::tests::common::{
        create_test_session, flat_stats, move_named, predictable_rng, TestCombatantBuilder,
    };
    use crate::config::BattleRules;
    use crate::pokemon::StatusCondition;
    use crate::rng::ScriptedRng;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::StatusKind;

    /// Fast attacker with the given status against a slow defender, both using Splash.
    fn session_with_status(status: StatusCondition) -> BattleState {
        let attacker = TestCombatantBuilder::new(25, 10)
            .with_moves(vec![move_named("Splash")])
            .with_stats(flat_stats(100, 200))
            .with_status(status)
            .build();
        let defender = TestCombatantBuilder::new(129, 10)
            .with_moves(vec![move_named("Splash")])
            .with_stats(flat_stats(100, 10))
            .build();
        create_test_session(attacker, defender)
    }

    fn attacker_moved(events: &[BattleEvent]) -> bool {
        events.iter().any(|event| {
            matches!(
                event,
                BattleEvent::MoveUsed {
                    side: Side::Attacker,
                    ..
                }
            )
        })
    }

    #[test]
    fn test_sleep_prevents_action_until_it_wears_off() {
        // Arrange
        let mut state = session_with_status(StatusCondition::asleep(2));
        let rules = BattleRules::default();
        let mut rng = predictable_rng();

        // Act: Turn 1
        let first = resolve_turn(&mut state, 0, 0, &rules, &mut rng)
            .unwrap_or_else(|err| panic!("turn should resolve: {err}"));

        // Assert: Turn 1
        assert!(first.events.contains(&BattleEvent::ActionPrevented {
            pokemon: "Pikachu".to_string(),
            reason: ActionFailureReason::IsAsleep,
        }));
        assert!(!attacker_moved(&first.events));
        assert_eq!(
            state.active(Side::Attacker).and_then(|c| c.status),
            Some(StatusCondition::asleep(1))
        );

        // Act: Turn 2 wakes up but still loses the turn
        let second = resolve_turn(&mut state, 0, 0, &rules, &mut rng)
            .unwrap_or_else(|err| panic!("turn should resolve: {err}"));

        // Assert: Turn 2
        assert!(second.events.contains(&BattleEvent::StatusCured {
            target: "Pikachu".to_string(),
            status: StatusKind::Sleep,
        }));
        assert!(!attacker_moved(&second.events));

        // Act & Assert: Turn 3 acts normally
        let third = resolve_turn(&mut state, 0, 0, &rules, &mut rng)
            .unwrap_or_else(|err| panic!("turn should resolve: {err}"));
        assert!(attacker_moved(&third.events));
    }

    #[rstest]
    #[case(0.1, true)]
    #[case(0.5, false)]
    fn test_paralysis_full_stop(#[case] roll: f64, #[case] prevented: bool) {
        // Arrange: paralysis check, then accuracy rolls for whoever acts
        let mut state = session_with_status(StatusCondition::new(StatusKind::Paralysis));
        let mut script = vec![roll, 0.5];
        if !prevented {
            script.push(0.5);
        }
        let mut rng = ScriptedRng::new(script);

        // Act
        let outcome = resolve_turn(&mut state, 0, 0, &BattleRules::default(), &mut rng)
            .unwrap_or_else(|err| panic!("turn should resolve: {err}"));

        // Assert
        assert_eq!(attacker_moved(&outcome.events), !prevented);
        assert_eq!(
            outcome.events.contains(&BattleEvent::ActionPrevented {
                pokemon: "Pikachu".to_string(),
                reason: ActionFailureReason::IsParalyzed,
            }),
            prevented
        );
        assert_eq!(rng.remaining(), 0);
        // Paralysis does not wear off on its own
        assert!(state
            .active(Side::Attacker)
            .is_some_and(|c| c.has_status(StatusKind::Paralysis)));
    }

    #[rstest]
    #[case(0.1, true)]
    #[case(0.5, false)]
    fn test_freeze_thaw_roll(#[case] roll: f64, #[case] thaws: bool) {
        // Arrange
        let mut state = session_with_status(StatusCondition::new(StatusKind::Freeze));
        let mut rng = ScriptedRng::new(vec![roll, 0.5, 0.5]);

        // Act
        let outcome = resolve_turn(&mut state, 0, 0, &BattleRules::default(), &mut rng)
            .unwrap_or_else(|err| panic!("turn should resolve: {err}"));

        // Assert
        assert_eq!(attacker_moved(&outcome.events), thaws);
        assert_eq!(
            outcome.events.contains(&BattleEvent::StatusCured {
                target: "Pikachu".to_string(),
                status: StatusKind::Freeze,
            }),
            thaws
        );
        assert_eq!(
            state
                .active(Side::Attacker)
                .is_some_and(|c| c.has_status(StatusKind::Freeze)),
            !thaws
        );
    }

    #[test]
    fn test_prevented_action_still_allows_opponent_to_act() {
        // Arrange
        let mut state = session_with_status(StatusCondition::asleep(3));
        let mut rng = predictable_rng();

        // Act
        let outcome = resolve_turn(&mut state, 0, 0, &BattleRules::default(), &mut rng)
            .unwrap_or_else(|err| panic!("turn should resolve: {err}"));

        // Assert
        assert!(outcome.events.iter().any(|event| matches!(
            event,
            BattleEvent::MoveUsed {
                side: Side::Defender,
                ..
            }
        )));
        assert_eq!(outcome.events.last(), Some(&BattleEvent::TurnEnded));
    }
}
