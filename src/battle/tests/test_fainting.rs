#[cfg(test)]
mod tests {
    use crate::battle::engine::resolve_turn;
    use crate::battle::state::{BattleEvent, GameState, Side};
    use crate::battle::tests::common::{
        create_team_session, create_test_session, flat_stats, move_named, predictable_rng,
        TestCombatantBuilder,
    };
    use crate::config::BattleRules;
    use crate::errors::ActionError;
    use crate::pokemon::StatusCondition;
    use pretty_assertions::assert_eq;
    use schema::{SpeciesId, StatType, StatusKind};

    #[test]
    fn test_pokemon_fainting_mechanics_unit() {
        // Arrange
        let mut pokemon = TestCombatantBuilder::new(25, 10).with_hp(20).build();

        // Act & Assert: Damage without fainting
        assert!(!pokemon.take_damage(10));
        assert_eq!(pokemon.current_hp(), 10);

        // Act & Assert: Fatal damage clamps to zero
        assert!(pokemon.take_damage(15));
        assert_eq!(pokemon.current_hp(), 0);
        assert!(pokemon.is_fainted());

        // Already fainted: no second faint, no healing
        assert!(!pokemon.take_damage(5));
        pokemon.heal(20);
        assert_eq!(pokemon.current_hp(), 0);
    }

    #[test]
    fn test_last_defender_fainting_is_victory() {
        // Arrange
        let attacker = TestCombatantBuilder::new(25, 20)
            .with_moves(vec![move_named("Tackle")])
            .with_stats(flat_stats(100, 100))
            .build();
        let defender = TestCombatantBuilder::new(129, 10)
            .with_moves(vec![move_named("Splash")])
            .with_stats(flat_stats(50, 10))
            .with_hp(1)
            .build();
        let mut state = create_test_session(attacker, defender);
        let mut rng = predictable_rng();

        // Act
        let outcome = resolve_turn(&mut state, 0, 0, &BattleRules::default(), &mut rng)
            .unwrap_or_else(|err| panic!("turn should resolve: {err}"));

        // Assert
        assert_eq!(outcome.game_state, GameState::Victory);
        assert!(outcome.events.contains(&BattleEvent::PokemonFainted {
            side: Side::Defender,
            pokemon: "Magikarp".to_string(),
        }));
        assert_eq!(
            outcome.events.last(),
            Some(&BattleEvent::BattleEnded {
                result: GameState::Victory
            })
        );
        // The fainted defender never got to move
        assert!(!outcome.events.iter().any(|event| matches!(
            event,
            BattleEvent::MoveUsed {
                side: Side::Defender,
                ..
            }
        )));

        let terminal = state.terminal_outcome();
        assert_eq!(terminal.participants, vec![SpeciesId(25)]);
        assert_eq!(terminal.opponents_defeated, 1);
    }

    #[test]
    fn test_last_attacker_fainting_is_defeat() {
        // Arrange
        let attacker = TestCombatantBuilder::new(129, 10)
            .with_moves(vec![move_named("Splash")])
            .with_stats(flat_stats(50, 10))
            .with_hp(1)
            .build();
        let defender = TestCombatantBuilder::new(25, 20)
            .with_moves(vec![move_named("Tackle")])
            .with_stats(flat_stats(100, 100))
            .build();
        let mut state = create_test_session(attacker, defender);
        let mut rng = predictable_rng();

        // Act
        let outcome = resolve_turn(&mut state, 0, 0, &BattleRules::default(), &mut rng)
            .unwrap_or_else(|err| panic!("turn should resolve: {err}"));

        // Assert
        assert_eq!(outcome.game_state, GameState::Defeat);
        assert!(state.is_finished());
        assert_eq!(
            resolve_turn(&mut state, 0, 0, &BattleRules::default(), &mut rng),
            Err(ActionError::NotInProgress(GameState::Defeat))
        );
    }

    #[test]
    fn test_fainted_defender_is_replaced_by_next_member() {
        // Arrange
        let attacker = TestCombatantBuilder::new(25, 20)
            .with_moves(vec![move_named("Tackle")])
            .with_stats(flat_stats(100, 100))
            .build();
        let lead = TestCombatantBuilder::new(129, 10)
            .with_moves(vec![move_named("Splash")])
            .with_stats(flat_stats(50, 10))
            .with_hp(1)
            .build();
        let mut backup = TestCombatantBuilder::new(19, 10)
            .with_moves(vec![move_named("Tackle")])
            .with_status(StatusCondition::new(StatusKind::Poison))
            .build();
        backup.stages.set(StatType::Attack, 2);
        let mut state = create_team_session(vec![attacker], vec![lead, backup]);
        let mut rng = predictable_rng();

        // Act
        let outcome = resolve_turn(&mut state, 0, 0, &BattleRules::default(), &mut rng)
            .unwrap_or_else(|err| panic!("turn should resolve: {err}"));

        // Assert
        assert_eq!(outcome.game_state, GameState::InProgress);
        assert!(outcome.events.contains(&BattleEvent::SwitchedIn {
            side: Side::Defender,
            pokemon: "Rattata".to_string(),
        }));
        assert_eq!(outcome.events.last(), Some(&BattleEvent::TurnEnded));

        let defender_side = state.side(Side::Defender);
        assert_eq!(defender_side.active_index, 1);
        assert_eq!(defender_side.participated, vec![0, 1]);

        // The replacement enters with a clean slate
        let incoming = state
            .active(Side::Defender)
            .unwrap_or_else(|| panic!("replacement should be active"));
        assert_eq!(incoming.status, None);
        assert!(incoming.stages.is_neutral());
    }

    #[test]
    fn test_double_knockout_is_defeat() {
        // Arrange: the attacker wins the exchange but burns out at end of turn
        let attacker = TestCombatantBuilder::new(4, 20)
            .with_moves(vec![move_named("Tackle")])
            .with_stats(flat_stats(100, 100))
            .with_status(StatusCondition::new(StatusKind::Burn))
            .with_hp(1)
            .build();
        let defender = TestCombatantBuilder::new(129, 10)
            .with_moves(vec![move_named("Splash")])
            .with_stats(flat_stats(50, 10))
            .with_hp(1)
            .build();
        let mut state = create_test_session(attacker, defender);
        let mut rng = predictable_rng();

        // Act
        let outcome = resolve_turn(&mut state, 0, 0, &BattleRules::default(), &mut rng)
            .unwrap_or_else(|err| panic!("turn should resolve: {err}"));

        // Assert
        assert!(outcome.events.contains(&BattleEvent::PokemonFainted {
            side: Side::Attacker,
            pokemon: "Charmander".to_string(),
        }));
        assert_eq!(outcome.game_state, GameState::Defeat);
        assert_eq!(state.terminal_outcome().opponents_defeated, 1);
    }
}
