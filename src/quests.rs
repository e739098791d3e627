//! Daily quests: three slots drawn from a fixed table, advanced by events
//! derived from pack openings and finished battles.

use crate::battle::state::GameState;
use crate::catalog::Catalog;
use crate::loot::LootResult;
use crate::rewards::RewardReport;
use crate::rng::BattleRng;
use schema::{PokemonType, SpeciesId};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{debug, info};

const QUESTS_RON: &str = include_str!("../data/quests.ron");

static QUEST_TABLE: LazyLock<Vec<QuestTemplate>> =
    LazyLock::new(|| ron::from_str(QUESTS_RON).expect("bundled quest data is valid"));

pub const DAILY_QUEST_COUNT: usize = 3;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuestKind {
    CatchPokemon,
    CatchType(PokemonType),
    CatchUnique,
    CatchLegendary,
    WinBattles,
    DefeatTrainers,
    DefeatGymLeader,
    OpenPacks,
    /// Open at least `target` packs in a single batch.
    BulkOpenPacks,
    EarnPokedollars,
    LevelUpPokemon,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QuestTemplate {
    pub kind: QuestKind,
    pub target: u32,
    pub reward: u32,
    pub description: String,
}

pub fn bundled_quests() -> &'static [QuestTemplate] {
    &QUEST_TABLE
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpponentKind {
    Wild,
    Trainer,
    GymLeader,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum QuestEvent {
    Caught {
        species: SpeciesId,
        types: Vec<PokemonType>,
        legendary: bool,
    },
    BattleWon {
        opponent: OpponentKind,
    },
    PacksOpened {
        count: u32,
        bulk: bool,
    },
    EarnedPokedollars(u32),
    LeveledUp {
        species: SpeciesId,
    },
}

fn species_types(catalog: &dyn Catalog, species: SpeciesId) -> Vec<PokemonType> {
    catalog.types(species).unwrap_or_else(|err| {
        debug!(%species, %err, "no type data for caught species");
        Vec::new()
    })
}

impl QuestEvent {
    /// Events for a batch of packs opened together.
    pub fn from_loot(results: &[LootResult], catalog: &dyn Catalog) -> Vec<QuestEvent> {
        let mut events = vec![QuestEvent::PacksOpened {
            count: results.len() as u32,
            bulk: results.len() > 1,
        }];
        events.extend(results.iter().flat_map(|result| &result.creatures).map(|creature| {
            QuestEvent::Caught {
                species: creature.species,
                types: species_types(catalog, creature.species),
                legendary: creature.is_legendary,
            }
        }));
        events
    }

    /// Events for a finished battle. Anything other than a victory only
    /// counts its level-ups.
    pub fn from_rewards(
        report: &RewardReport,
        opponent: OpponentKind,
        catalog: &dyn Catalog,
    ) -> Vec<QuestEvent> {
        let mut events = Vec::new();
        if report.outcome.result == GameState::Victory {
            events.push(QuestEvent::BattleWon { opponent });
        }
        if report.currency > 0 {
            events.push(QuestEvent::EarnedPokedollars(report.currency));
        }
        if let Some(catch) = report.caught {
            events.push(QuestEvent::Caught {
                species: catch.species,
                types: species_types(catalog, catch.species),
                legendary: false,
            });
        }
        events.extend(report.leveled_up().map(|award| QuestEvent::LeveledUp {
            species: award.species,
        }));
        events
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QuestSlot {
    pub quest: QuestTemplate,
    pub progress: u32,
    pub completed: bool,
    /// Species already counted by a unique-catch quest.
    #[serde(default)]
    seen: Vec<SpeciesId>,
}

impl QuestSlot {
    pub fn new(quest: QuestTemplate) -> Self {
        Self {
            quest,
            progress: 0,
            completed: false,
            seen: Vec::new(),
        }
    }

    fn advance_by(&self, event: &QuestEvent) -> u32 {
        match (self.quest.kind, event) {
            (QuestKind::CatchPokemon, QuestEvent::Caught { .. }) => 1,
            (QuestKind::CatchType(wanted), QuestEvent::Caught { types, .. }) => {
                u32::from(types.contains(&wanted))
            }
            (QuestKind::CatchUnique, QuestEvent::Caught { species, .. }) => {
                u32::from(!self.seen.contains(species))
            }
            (QuestKind::CatchLegendary, QuestEvent::Caught { legendary, .. }) => {
                u32::from(*legendary)
            }
            (QuestKind::WinBattles, QuestEvent::BattleWon { .. }) => 1,
            (QuestKind::DefeatTrainers, QuestEvent::BattleWon { opponent }) => {
                u32::from(*opponent == OpponentKind::Trainer)
            }
            (QuestKind::DefeatGymLeader, QuestEvent::BattleWon { opponent }) => {
                u32::from(*opponent == OpponentKind::GymLeader)
            }
            (QuestKind::OpenPacks, QuestEvent::PacksOpened { count, .. }) => *count,
            (QuestKind::EarnPokedollars, QuestEvent::EarnedPokedollars(amount)) => *amount,
            (QuestKind::LevelUpPokemon, QuestEvent::LeveledUp { .. }) => 1,
            _ => 0,
        }
    }

    /// Apply an event. Returns true if this event completed the slot.
    fn record(&mut self, event: &QuestEvent) -> bool {
        if self.completed {
            return false;
        }

        if let (QuestKind::BulkOpenPacks, QuestEvent::PacksOpened { count, bulk: true }) =
            (self.quest.kind, event)
        {
            self.progress = self.progress.max(*count).min(self.quest.target);
        } else {
            let gained = self.advance_by(event);
            if gained == 0 {
                return false;
            }
            if let (QuestKind::CatchUnique, QuestEvent::Caught { species, .. }) =
                (self.quest.kind, event)
            {
                self.seen.push(*species);
            }
            self.progress = self.progress.saturating_add(gained).min(self.quest.target);
        }

        self.completed = self.progress >= self.quest.target;
        self.completed
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DailyQuests {
    pub slots: [QuestSlot; DAILY_QUEST_COUNT],
}

impl DailyQuests {
    /// Draw three distinct quests from the bundled table.
    pub fn generate(rng: &mut dyn BattleRng) -> Self {
        match Self::generate_from(bundled_quests(), rng) {
            Some(quests) => quests,
            None => unreachable!("bundled quest table has at least {DAILY_QUEST_COUNT} entries"),
        }
    }

    /// Draw three distinct quests from `table`. `None` if the table is too small.
    pub fn generate_from(table: &[QuestTemplate], rng: &mut dyn BattleRng) -> Option<Self> {
        if table.len() < DAILY_QUEST_COUNT {
            return None;
        }

        // Partial Fisher-Yates over indices
        let mut indices: Vec<usize> = (0..table.len()).collect();
        for i in 0..DAILY_QUEST_COUNT {
            let offset = rng.pick(indices.len() - i, "Daily Quest")?;
            indices.swap(i, i + offset);
        }

        let slots = [0, 1, 2].map(|i| QuestSlot::new(table[indices[i]].clone()));
        debug!(
            quests = ?slots.iter().map(|slot| slot.quest.description.as_str()).collect::<Vec<_>>(),
            "daily quests generated"
        );
        Some(Self { slots })
    }

    /// Advance matching slots. Returns the indices of slots this event completed.
    pub fn record(&mut self, event: &QuestEvent) -> Vec<usize> {
        let completed: Vec<usize> = self
            .slots
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| slot.record(event).then_some(index))
            .collect();

        for &index in &completed {
            info!(
                quest = %self.slots[index].quest.description,
                reward = self.slots[index].quest.reward,
                "daily quest completed"
            );
        }
        completed
    }

    pub fn record_all<'a>(
        &mut self,
        events: impl IntoIterator<Item = &'a QuestEvent>,
    ) -> Vec<usize> {
        events.into_iter().flat_map(|event| self.record(event)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuestSlot> {
        self.slots.iter()
    }

    pub fn earned_reward(&self) -> u32 {
        self.slots
            .iter()
            .filter(|slot| slot.completed)
            .map(|slot| slot.quest.reward)
            .sum()
    }
}
