//! Species and move lookups consumed by the engine.
//!
//! The engine only ever talks to a [`Catalog`]; the bundled [`StaticCatalog`]
//! is built from the RON tables under `data/` and embedded at compile time.

use crate::errors::{CatalogError, CatalogResult};
use schema::{BaseStats, MoveData, PokemonType, SpeciesData, SpeciesId};
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::warn;

const SPECIES_RON: &str = include_str!("../data/species.ron");
const MOVES_RON: &str = include_str!("../data/moves.ron");

static BUNDLED: LazyLock<StaticCatalog> = LazyLock::new(|| {
    StaticCatalog::from_ron(SPECIES_RON, MOVES_RON).expect("bundled catalog data is valid")
});

/// Read access to species and move data.
pub trait Catalog {
    fn name(&self, species: SpeciesId) -> CatalogResult<String>;
    fn base_stats(&self, species: SpeciesId) -> CatalogResult<BaseStats>;
    fn types(&self, species: SpeciesId) -> CatalogResult<Vec<PokemonType>>;

    /// Every distinct move learnable at or below `max_level`, in learn order.
    /// Below the first learn level the whole learnset counts; an empty
    /// learnset yields an empty list.
    fn learnset(&self, species: SpeciesId, max_level: u32) -> CatalogResult<Vec<MoveData>>;

    /// Like [`Catalog::learnset`], but never empty: falls back to Tackle.
    fn learnable_moves(&self, species: SpeciesId, max_level: u32) -> CatalogResult<Vec<MoveData>> {
        let moves = self.learnset(species, max_level)?;
        if moves.is_empty() {
            warn!(%species, max_level, "no learnable moves, falling back to Tackle");
            return Ok(vec![MoveData::tackle()]);
        }
        Ok(moves)
    }
}

#[derive(Debug, Clone)]
pub struct StaticCatalog {
    species: HashMap<SpeciesId, SpeciesData>,
    moves: HashMap<String, MoveData>,
}

impl StaticCatalog {
    /// The catalog shipped with the crate.
    pub fn bundled() -> &'static StaticCatalog {
        &BUNDLED
    }

    pub fn from_ron(species_text: &str, moves_text: &str) -> CatalogResult<Self> {
        let species: Vec<SpeciesData> = ron::from_str(species_text)
            .map_err(|err| CatalogError::Malformed(format!("species table: {err}")))?;
        let moves: Vec<MoveData> = ron::from_str(moves_text)
            .map_err(|err| CatalogError::Malformed(format!("move table: {err}")))?;
        Self::new(species, moves)
    }

    /// Build a catalog, checking that every learnset entry names a known move.
    pub fn new(species: Vec<SpeciesData>, moves: Vec<MoveData>) -> CatalogResult<Self> {
        let moves: HashMap<String, MoveData> = moves
            .into_iter()
            .map(|data| (normalize(&data.name), data))
            .collect();

        let mut by_id = HashMap::with_capacity(species.len());
        for data in species {
            if data.types.is_empty() {
                return Err(CatalogError::Malformed(format!("{} has no types", data.name)));
            }
            for entry in &data.learnset {
                if !moves.contains_key(&normalize(&entry.move_name)) {
                    return Err(CatalogError::UnknownMove {
                        species: data.id,
                        name: entry.move_name.clone(),
                    });
                }
            }
            if by_id.insert(data.id, data).is_some() {
                return Err(CatalogError::Malformed("duplicate species id".to_string()));
            }
        }

        Ok(Self {
            species: by_id,
            moves,
        })
    }

    pub fn species(&self, id: SpeciesId) -> CatalogResult<&SpeciesData> {
        self.species.get(&id).ok_or(CatalogError::UnknownSpecies(id))
    }

    /// Look up a move by name, ignoring case and separators.
    pub fn move_data(&self, name: &str) -> Option<&MoveData> {
        self.moves.get(&normalize(name))
    }

    pub fn find_by_name(&self, name: &str) -> Option<&SpeciesData> {
        self.species
            .values()
            .find(|data| data.name.eq_ignore_ascii_case(name))
    }

    pub fn species_ids(&self) -> impl Iterator<Item = SpeciesId> + '_ {
        self.species.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}

impl Catalog for StaticCatalog {
    fn name(&self, species: SpeciesId) -> CatalogResult<String> {
        Ok(self.species(species)?.name.clone())
    }

    fn base_stats(&self, species: SpeciesId) -> CatalogResult<BaseStats> {
        Ok(self.species(species)?.base_stats)
    }

    fn types(&self, species: SpeciesId) -> CatalogResult<Vec<PokemonType>> {
        Ok(self.species(species)?.types.clone())
    }

    fn learnset(&self, species: SpeciesId, max_level: u32) -> CatalogResult<Vec<MoveData>> {
        let data = self.species(species)?;

        let mut names: Vec<&str> = data.moves_up_to(max_level).collect();
        if names.is_empty() {
            names = data.moves_up_to(u32::MAX).collect();
        }

        let mut learned: Vec<MoveData> = Vec::new();
        for name in names {
            let move_data = self.move_data(name).ok_or_else(|| CatalogError::UnknownMove {
                species,
                name: name.to_string(),
            })?;
            // Relearning a move moves it to the most recent slot
            learned.retain(|known| known.name != move_data.name);
            learned.push(move_data.clone());
        }
        Ok(learned)
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schema::{DamageClass, LevelMove};

    fn names(moves: &[MoveData]) -> Vec<&str> {
        moves.iter().map(|m| m.name.as_str()).collect()
    }

    fn small_catalog(learnset: Vec<(u8, &str)>) -> StaticCatalog {
        let species = SpeciesData {
            id: SpeciesId(999),
            name: "Testmon".to_string(),
            types: vec![PokemonType::Normal],
            base_stats: BaseStats {
                hp: 50,
                attack: 50,
                defense: 50,
                special_attack: 50,
                special_defense: 50,
                speed: 50,
            },
            learnset: learnset
                .into_iter()
                .map(|(level, name)| LevelMove {
                    level,
                    move_name: name.to_string(),
                })
                .collect(),
            legendary: false,
        };
        let moves = ["Scratch", "Growl", "Ember", "Leer", "Rage"]
            .iter()
            .map(|name| MoveData {
                name: name.to_string(),
                power: 40,
                accuracy: 100,
                move_type: PokemonType::Normal,
                damage_class: DamageClass::Physical,
                stat_changes: Vec::new(),
                ailment: None,
            })
            .collect();
        match StaticCatalog::new(vec![species], moves) {
            Ok(catalog) => catalog,
            Err(err) => panic!("test catalog should build: {err}"),
        }
    }

    #[test]
    fn test_bundled_catalog_loads() {
        let catalog = StaticCatalog::bundled();
        assert!(catalog.len() >= 30);
        for legendary in [144, 145, 146, 150, 151] {
            let data = catalog.species(SpeciesId(legendary));
            assert!(data.is_ok_and(|d| d.legendary), "#{legendary} should be legendary");
        }
    }

    #[test]
    fn test_learnset_filters_by_level() {
        let catalog = small_catalog(vec![
            (1, "Scratch"),
            (1, "Growl"),
            (7, "Ember"),
            (13, "Leer"),
            (20, "Rage"),
            (25, "Growl"),
        ]);

        let early = catalog.learnset(SpeciesId(999), 7).unwrap_or_default();
        let late = catalog.learnset(SpeciesId(999), 500).unwrap_or_default();

        assert_eq!(names(&early), vec!["Scratch", "Growl", "Ember"]);
        assert_eq!(names(&late), vec!["Scratch", "Ember", "Leer", "Rage", "Growl"]);
    }

    #[test]
    fn test_learnset_below_first_level_uses_whole_learnset() {
        let catalog = small_catalog(vec![(30, "Rage"), (40, "Leer")]);
        let moves = catalog.learnset(SpeciesId(999), 5).unwrap_or_default();
        assert_eq!(names(&moves), vec!["Rage", "Leer"]);
    }

    #[test]
    fn test_learnable_moves_falls_back_to_tackle() {
        let catalog = small_catalog(vec![]);
        assert_eq!(catalog.learnset(SpeciesId(999), 5), Ok(Vec::new()));
        let moves = catalog.learnable_moves(SpeciesId(999), 5).unwrap_or_default();
        assert_eq!(moves, vec![MoveData::tackle()]);
    }

    #[test]
    fn test_unknown_species_is_an_error() {
        let catalog = small_catalog(vec![]);
        assert_eq!(
            catalog.base_stats(SpeciesId(1)),
            Err(CatalogError::UnknownSpecies(SpeciesId(1)))
        );
    }

    #[test]
    fn test_learnset_with_unknown_move_is_rejected() {
        let result = StaticCatalog::from_ron(
            r#"[(id: 1, name: "Bulbasaur", types: [grass],
                base_stats: (hp: 45, attack: 49, defense: 49,
                    special_attack: 65, special_defense: 65, speed: 45),
                learnset: [(level: 1, move_name: "Vine Whip")])]"#,
            "[]",
        );
        assert!(matches!(result, Err(CatalogError::UnknownMove { .. })));
    }

    #[test]
    fn test_move_lookup_ignores_case_and_spacing() {
        let catalog = StaticCatalog::bundled();
        assert!(catalog.move_data("thunder shock").is_some());
        assert!(catalog.move_data("Thunder-Shock").is_some());
    }
}
