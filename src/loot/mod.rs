//! Pack opening.
//!
//! [`LootGenerator::open`] turns a validated [`PackConfig`] into a list of
//! creatures. It performs no I/O; storing the result is up to the caller.

pub mod config;

pub use config::{PackCatalog, PackConfig, PackConfigBuilder, PackTier};

use crate::rng::BattleRng;
use schema::SpeciesId;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Species a pack can draw from.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SpeciesPool {
    first: u16,
    last: u16,
    legendaries: Vec<SpeciesId>,
}

impl SpeciesPool {
    /// `first..=last` for generic draws, `legendaries` for forced ones.
    pub fn new(first: u16, last: u16, legendaries: Vec<SpeciesId>) -> Self {
        Self {
            first: first.min(last),
            last: first.max(last),
            legendaries,
        }
    }

    pub fn is_legendary(&self, species: SpeciesId) -> bool {
        self.legendaries.contains(&species)
    }

    pub fn legendaries(&self) -> &[SpeciesId] {
        &self.legendaries
    }

    fn draw_any(&self, rng: &mut dyn BattleRng) -> SpeciesId {
        let id = rng.range_inclusive(self.first as u32, self.last as u32, "Pack Species");
        SpeciesId(id as u16)
    }

    fn draw_legendary(&self, rng: &mut dyn BattleRng) -> Option<SpeciesId> {
        rng.pick(self.legendaries.len(), "Legendary Species")
            .map(|index| self.legendaries[index])
    }
}

impl Default for SpeciesPool {
    fn default() -> Self {
        Self::new(
            1,
            151,
            [144, 145, 146, 150, 151].into_iter().map(SpeciesId).collect(),
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratedCreature {
    pub species: SpeciesId,
    /// Outcome of this slot's own shiny roll.
    pub is_shiny: bool,
    pub is_legendary: bool,
    /// Drawn from the legendary set by a guarantee roll.
    pub forced_rare: bool,
    /// Made shiny to satisfy a shiny-or-legendary guarantee.
    pub promoted_shiny: bool,
}

impl GeneratedCreature {
    /// Whether the host should hand this creature out as shiny.
    pub fn shows_as_shiny(&self) -> bool {
        self.is_shiny || self.promoted_shiny
    }

    fn is_special(&self) -> bool {
        self.shows_as_shiny() || self.is_legendary
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LootResult {
    pub creatures: Vec<GeneratedCreature>,
    pub is_mega: bool,
    pub legendary_count: u32,
    /// Rolled shinies only; promotions are counted in `promoted_count`.
    pub shiny_count: u32,
    pub forced_rare_count: u32,
    pub promoted_count: u32,
}

impl LootResult {
    fn from_creatures(creatures: Vec<GeneratedCreature>, is_mega: bool) -> Self {
        let count = |f: fn(&GeneratedCreature) -> bool| {
            creatures.iter().filter(|c| f(c)).count() as u32
        };
        Self {
            legendary_count: count(|c| c.is_legendary),
            shiny_count: count(|c| c.is_shiny),
            forced_rare_count: count(|c| c.forced_rare),
            promoted_count: count(|c| c.promoted_shiny),
            creatures,
            is_mega,
        }
    }

    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }
}

/// Totals over several opened packs.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LootTotals {
    pub packs: u32,
    pub mega_packs: u32,
    pub creatures: u32,
    pub legendary_count: u32,
    pub shiny_count: u32,
    pub promoted_count: u32,
}

impl LootTotals {
    pub fn of(results: &[LootResult]) -> Self {
        results.iter().fold(Self::default(), |mut totals, result| {
            totals.packs += 1;
            totals.mega_packs += u32::from(result.is_mega);
            totals.creatures += result.len() as u32;
            totals.legendary_count += result.legendary_count;
            totals.shiny_count += result.shiny_count;
            totals.promoted_count += result.promoted_count;
            totals
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct LootGenerator {
    pool: SpeciesPool,
}

impl LootGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pool(pool: SpeciesPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SpeciesPool {
        &self.pool
    }

    pub fn open(&self, config: &PackConfig, rng: &mut dyn BattleRng) -> LootResult {
        let is_mega =
            config.mega_chance() > 0.0 && rng.chance(config.mega_chance(), "Mega Pack Check");
        let size = if is_mega {
            config.mega_size()
        } else {
            rng.range_inclusive(config.min_count(), config.max_count(), "Pack Size")
        };

        let mut forced = 0u32;
        let mut creatures = Vec::with_capacity(size as usize);
        for slot in 0..size {
            let forced_species = match config.guaranteed_rare_count() {
                Some(limit) if forced < limit => {
                    if rng.chance(config.forced_legendary_chance(), "Forced Legendary") {
                        self.pool.draw_legendary(rng)
                    } else {
                        None
                    }
                }
                _ => None,
            };
            let forced_rare = forced_species.is_some();
            if forced_rare {
                forced += 1;
            }
            let species = match forced_species {
                Some(species) => species,
                None => self.pool.draw_any(rng),
            };
            let is_shiny = rng.chance(config.shiny_chance(), "Shiny");

            debug!(slot, species = %species, is_shiny, forced_rare, "pack slot");
            creatures.push(GeneratedCreature {
                species,
                is_shiny,
                is_legendary: self.pool.is_legendary(species),
                forced_rare,
                promoted_shiny: false,
            });
        }

        if let Some(required) = config.guaranteed_shiny_or_legendary_count() {
            promote_to_shiny(&mut creatures, required as usize);
        }

        let result = LootResult::from_creatures(creatures, is_mega);
        info!(
            size = result.len(),
            is_mega,
            legendary = result.legendary_count,
            shiny = result.shiny_count,
            promoted = result.promoted_count,
            "pack opened"
        );
        result
    }

    /// Open several packs in order, one result per pack.
    pub fn open_many(&self, configs: &[&PackConfig], rng: &mut dyn BattleRng) -> Vec<LootResult> {
        configs.iter().map(|config| self.open(config, rng)).collect()
    }
}

/// Promote the last ordinary creatures until `required` are shiny or legendary.
/// The rolled `is_shiny` flag is left as it was.
fn promote_to_shiny(creatures: &mut [GeneratedCreature], required: usize) {
    let special = creatures.iter().filter(|c| c.is_special()).count();
    let missing = required.saturating_sub(special);

    for creature in creatures
        .iter_mut()
        .rev()
        .filter(|c| !c.is_special())
        .take(missing)
    {
        creature.promoted_shiny = true;
    }
}
