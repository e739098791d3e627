use crate::battle::stats::{effective_accuracy, effective_attack, effective_defense};
use crate::config::BattleRules;
use crate::pokemon::Combatant;
use crate::rng::BattleRng;
use schema::{MoveData, PokemonType};
use tracing::debug;

/// Single-hit outcome of one move against one target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitOutcome {
    pub hit: bool,
    pub damage: u16,
    pub is_critical: bool,
    pub effectiveness: f64,
}

impl HitOutcome {
    fn miss() -> Self {
        Self {
            hit: false,
            damage: 0,
            is_critical: false,
            effectiveness: 1.0,
        }
    }

    fn status_hit() -> Self {
        Self {
            hit: true,
            ..Self::miss()
        }
    }
}

/// The level/power/attack/defense core of the damage formula, before any multiplier.
pub fn base_damage(level: u32, power: u16, attack: u16, defense: u16) -> f64 {
    let level_factor = 2.0 * level as f64 / 5.0 + 2.0;
    (level_factor * power as f64 * attack as f64 / defense.max(1) as f64 / 50.0) + 2.0
}

/// Floor the multiplied damage. Anything the chart did not zero deals at least 1.
pub fn finalize_damage(raw: f64, effectiveness: f64) -> u16 {
    if effectiveness == 0.0 {
        return 0;
    }
    (raw.floor() as u16).max(1)
}

/// Resolve one use of `move_data` by `attacker` against `defender`.
///
/// Rolls, in order: accuracy, critical hit, damage spread. Status-class
/// moves stop after the accuracy roll and deal no damage.
pub fn resolve_hit(
    move_data: &MoveData,
    attacker: &Combatant,
    defender: &Combatant,
    rules: &BattleRules,
    rng: &mut dyn BattleRng,
) -> HitOutcome {
    // Accuracy check
    let accuracy = effective_accuracy(move_data.accuracy, attacker, defender);
    let roll = rng.roll_percent("Accuracy Check");
    if roll as f64 > accuracy {
        debug!(move_name = %move_data.name, roll, accuracy, "move missed");
        return HitOutcome::miss();
    }

    if move_data.is_status() {
        return HitOutcome::status_hit();
    }

    let is_critical = rng.chance(rules.critical_hit_chance, "Critical Hit Check");

    let attack = effective_attack(attacker, move_data.damage_class);
    let defense = effective_defense(defender, move_data.damage_class);
    let mut damage = base_damage(attacker.level, move_data.power, attack, defense);

    if is_critical {
        damage *= rules.critical_multiplier;
    }

    damage *= rng.uniform(rules.random_factor_floor, 1.0, "Damage Spread");

    let effectiveness = PokemonType::effectiveness(move_data.move_type, &defender.types);
    damage *= effectiveness;

    if attacker.has_type(move_data.move_type) {
        damage *= rules.stab_multiplier;
    }

    let damage = finalize_damage(damage, effectiveness);
    debug!(
        move_name = %move_data.name,
        attacker = %attacker.name,
        defender = %defender.name,
        attack,
        defense,
        is_critical,
        effectiveness,
        damage,
        "resolved hit"
    );

    HitOutcome {
        hit: true,
        damage,
        is_critical,
        effectiveness,
    }
}
