#[cfg(test)]
mod tests {
    use crate::battle::engine::resolve_turn;
    use crate::battle::state::BattleEvent;
    use crate::battle::tests::common::{
        create_test_session, flat_stats, move_named, TestCombatantBuilder,
    };
    use crate::config::BattleRules;
    use crate::rng::ScriptedRng;

    /// Damage dealt by one Tackle, given the critical-hit roll.
    fn tackle_damage(crit_roll: f64, rules: &BattleRules) -> (u16, bool) {
        let attacker = TestCombatantBuilder::new(19, 30)
            .with_moves(vec![move_named("Tackle")])
            .with_stats(flat_stats(200, 100))
            .build();
        let defender = TestCombatantBuilder::new(16, 30)
            .with_moves(vec![move_named("Splash")])
            .with_stats(flat_stats(200, 10))
            .build();
        let mut state = create_test_session(attacker, defender);
        // accuracy, crit, spread (top of range), then the defender's accuracy
        let mut rng = ScriptedRng::new(vec![0.5, crit_roll, 0.999_999, 0.5]);

        let outcome = resolve_turn(&mut state, 0, 0, rules, &mut rng)
            .unwrap_or_else(|err| panic!("turn should resolve: {err}"));

        let damage = outcome
            .events
            .iter()
            .find_map(|event| match event {
                BattleEvent::DamageDealt { damage, .. } => Some(*damage),
                _ => None,
            })
            .unwrap_or_else(|| panic!("Tackle should deal damage"));
        let critical = outcome.events.contains(&BattleEvent::CriticalHit);
        (damage, critical)
    }

    #[test]
    fn test_critical_hit_multiplies_damage() {
        // Arrange
        let rules = BattleRules::default();

        // Act
        let (normal, normal_crit) = tackle_damage(0.5, &rules);
        let (critical, critical_flag) = tackle_damage(0.01, &rules);

        // Assert
        assert!(!normal_crit);
        assert!(critical_flag);
        assert!(critical > normal);
        // 1.5x on the pre-floor value stays within a point of 1.5x the floored one
        let scaled = normal as f64 * 1.5;
        assert!((critical as f64 - scaled).abs() <= 1.5, "{critical} vs {scaled}");
    }

    #[test]
    fn test_critical_chance_comes_from_rules() {
        // Arrange
        let rules = BattleRules {
            critical_hit_chance: 0.0,
            ..BattleRules::default()
        };

        // Act
        let (_, critical) = tackle_damage(0.0, &rules);

        // Assert
        assert!(!critical);
    }
}
