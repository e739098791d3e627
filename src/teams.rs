//! Rosters for both sides of a battle: the owner's species at their shared
//! level, rolled trainer teams and fixed gym leader teams.

use crate::catalog::Catalog;
use crate::errors::CatalogResult;
use crate::pokemon::{Combatant, MAX_MOVES};
use crate::progression::SpeciesLevels;
use crate::rewards::{CatchReward, RewardPlan};
use crate::rng::BattleRng;
use schema::{MoveData, PokemonType, SpeciesId};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

const TRAINERS_RON: &str = include_str!("../data/trainers.ron");

static TRAINER_BOOK: LazyLock<TrainerBook> = LazyLock::new(|| {
    ron::from_str(TRAINERS_RON).expect("bundled trainer data is valid")
});

/// Trainer levels are never scaled past this.
pub const TRAINER_LEVEL_CAP: u32 = 50;
/// Average owner level at which trainer teams start scaling up.
pub const TRAINER_SCALING_BASELINE: u32 = 15;
/// Fixed XP for beating a regular trainer.
pub const TRAINER_XP: u32 = 50;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterEntry {
    pub species: SpeciesId,
    pub level: u32,
}

impl RosterEntry {
    pub fn new(species: u16, level: u32) -> Self {
        Self {
            species: SpeciesId(species),
            level,
        }
    }
}

/// Build a fresh combatant from the catalog at the entry's level, with a
/// balanced moveset. Unknown species are an error.
pub fn build_combatant(
    catalog: &dyn Catalog,
    entry: RosterEntry,
    rng: &mut dyn BattleRng,
) -> CatalogResult<Combatant> {
    let level = entry.level.max(1);
    let moves = balanced_moveset(catalog, entry.species, level, rng)?;

    Ok(Combatant::new(
        entry.species,
        catalog.name(entry.species)?,
        level,
        catalog.base_stats(entry.species)?,
        catalog.types(entry.species)?,
        moves,
    ))
}

pub fn build_roster(
    catalog: &dyn Catalog,
    entries: &[RosterEntry],
    rng: &mut dyn BattleRng,
) -> CatalogResult<Vec<Combatant>> {
    entries
        .iter()
        .map(|&entry| build_combatant(catalog, entry, rng))
        .collect()
}

/// Build the owner's side, each species at its persisted shared level.
pub fn build_owned_roster(
    catalog: &dyn Catalog,
    levels: &dyn SpeciesLevels,
    owner: &str,
    species: &[SpeciesId],
    rng: &mut dyn BattleRng,
) -> CatalogResult<Vec<Combatant>> {
    species
        .iter()
        .map(|&id| {
            let entry = RosterEntry {
                species: id,
                level: levels.species_level(owner, id),
            };
            build_combatant(catalog, entry, rng)
        })
        .collect()
}

/// Two attacks, one self buff and one debuff from what the species knows
/// at `level`.
///
/// Missing attacks are padded with Tackle (in the species' own type) or
/// Scratch; a missing buff becomes Growl and a missing debuff Tail Whip.
/// The result always holds at least one damaging move.
pub fn balanced_moveset(
    catalog: &dyn Catalog,
    species: SpeciesId,
    level: u32,
    rng: &mut dyn BattleRng,
) -> CatalogResult<Vec<MoveData>> {
    let (attacks, status): (Vec<MoveData>, Vec<MoveData>) = catalog
        .learnset(species, level)?
        .into_iter()
        .partition(|move_data| !move_data.is_status());
    let (buffs, debuffs): (Vec<MoveData>, Vec<MoveData>) =
        status.into_iter().partition(MoveData::is_self_buff);

    let mut moves = match attacks.as_slice() {
        [] => vec![MoveData::tackle(), MoveData::scratch()],
        [only] if only.name == MoveData::FALLBACK_NAME => vec![only.clone(), MoveData::scratch()],
        [only] => {
            let own_type = catalog
                .types(species)?
                .first()
                .copied()
                .unwrap_or(PokemonType::Normal);
            let tackle = MoveData {
                move_type: own_type,
                ..MoveData::tackle()
            };
            vec![only.clone(), tackle]
        }
        _ => {
            let first = rng.pick(attacks.len(), "Attack Move").unwrap_or(0);
            let mut second = rng.pick(attacks.len() - 1, "Attack Move").unwrap_or(0);
            if second >= first {
                second += 1;
            }
            vec![attacks[first].clone(), attacks[second].clone()]
        }
    };

    let buff = pick_move(&buffs, "Buff Move", rng).unwrap_or_else(MoveData::growl);
    let debuff = pick_move(&debuffs, "Debuff Move", rng).unwrap_or_else(MoveData::tail_whip);
    let fillers = [MoveData::growl(), MoveData::tail_whip(), MoveData::scratch()];
    for candidate in [buff, debuff].into_iter().chain(fillers) {
        if moves.len() >= MAX_MOVES {
            break;
        }
        if !moves.iter().any(|known| known.name == candidate.name) {
            moves.push(candidate);
        }
    }

    let names: Vec<&str> = moves.iter().map(|m| m.name.as_str()).collect();
    debug!(%species, level, moves = ?names, "moveset chosen");
    Ok(moves)
}

fn pick_move(moves: &[MoveData], reason: &str, rng: &mut dyn BattleRng) -> Option<MoveData> {
    rng.pick(moves.len(), reason)
        .and_then(|index| moves.get(index))
        .cloned()
}

/// Integer mean of the given levels; an empty list counts as the scaling baseline.
pub fn average_level(levels: &[u32]) -> u32 {
    if levels.is_empty() {
        return TRAINER_SCALING_BASELINE;
    }
    let total: u64 = levels.iter().map(|&level| level as u64).sum();
    (total / levels.len() as u64) as u32
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TrainerTemplate {
    pub name: String,
    pub class: String,
    pub species: Vec<SpeciesId>,
    pub level_range: (u32, u32),
    pub reward_money: u32,
}

impl TrainerTemplate {
    /// Rewards for beating this trainer; `catch` is whatever was being fought over.
    pub fn reward_plan(&self, catch: Option<CatchReward>) -> RewardPlan {
        RewardPlan {
            currency: self.reward_money,
            xp: TRAINER_XP,
            catch,
            pack: None,
        }
    }

    /// The level range shifted toward the owner's average level and capped.
    pub fn scaled_level_range(&self, user_level_avg: u32) -> (u32, u32) {
        let adjustment = user_level_avg.saturating_sub(TRAINER_SCALING_BASELINE);
        let (min_level, max_level) = self.level_range;
        (
            min_level.saturating_add(adjustment).min(TRAINER_LEVEL_CAP),
            max_level.saturating_add(adjustment).min(TRAINER_LEVEL_CAP),
        )
    }
}

/// Roll a trainer's team: every listed species at a level drawn uniformly
/// from the scaled range.
pub fn roll_trainer_team(
    template: &TrainerTemplate,
    user_level_avg: u32,
    rng: &mut dyn BattleRng,
) -> Vec<RosterEntry> {
    let (min_level, max_level) = template.scaled_level_range(user_level_avg);
    debug!(trainer = %template.name, min_level, max_level, "rolling trainer team");

    template
        .species
        .iter()
        .map(|&species| RosterEntry {
            species,
            level: rng.range_inclusive(min_level, max_level, "Trainer Level"),
        })
        .collect()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GymRewards {
    pub pokedollars: u32,
    pub xp: u32,
    pub pack: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GymLeader {
    pub key: String,
    pub name: String,
    pub specialty: PokemonType,
    pub badge: String,
    pub team: Vec<RosterEntry>,
    pub rewards: GymRewards,
    pub difficulty: u8,
}

impl GymLeader {
    pub fn reward_plan(&self) -> RewardPlan {
        RewardPlan {
            currency: self.rewards.pokedollars,
            xp: self.rewards.xp,
            catch: None,
            pack: Some(self.rewards.pack.clone()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
struct TrainerBook {
    trainers: Vec<TrainerTemplate>,
    gym_leaders: Vec<GymLeader>,
}

pub fn bundled_trainers() -> &'static [TrainerTemplate] {
    &TRAINER_BOOK.trainers
}

pub fn gym_leaders() -> &'static [GymLeader] {
    &TRAINER_BOOK.gym_leaders
}

pub fn find_trainer(name: &str) -> Option<&'static TrainerTemplate> {
    bundled_trainers()
        .iter()
        .find(|trainer| trainer.name.eq_ignore_ascii_case(name))
}

/// Look up a gym leader by key ("brock") or display name ("Lt. Surge").
pub fn find_gym_leader(name: &str) -> Option<&'static GymLeader> {
    gym_leaders()
        .iter()
        .find(|leader| {
            leader.key.eq_ignore_ascii_case(name) || leader.name.eq_ignore_ascii_case(name)
        })
}
