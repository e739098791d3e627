//! Validated pack configuration.
//!
//! A [`PackConfig`] can only be obtained through validation, either
//! [`PackConfig::builder`] or deserialization, so opening a pack never has
//! to second-guess its numbers.

use crate::errors::{PackConfigError, PackConfigResult};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

const PACKS_RON: &str = include_str!("../../data/packs.ron");

static BUNDLED_PACKS: LazyLock<PackCatalog> = LazyLock::new(|| {
    PackCatalog::from_ron_str(PACKS_RON).expect("bundled pack data is valid")
});

/// Guarantee count used when the flag is set without a count.
pub const DEFAULT_GUARANTEE_COUNT: u32 = 1;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "RawPackConfig", into = "RawPackConfig")]
pub struct PackConfig {
    min_count: u32,
    max_count: u32,
    shiny_chance: f64,
    legendary_chance: f64,
    mega_chance: f64,
    mega_size: u32,
    guaranteed_rare: Option<u32>,
    guaranteed_shiny_or_legendary: Option<u32>,
}

impl PackConfig {
    pub fn builder(min_count: u32, max_count: u32) -> PackConfigBuilder {
        PackConfigBuilder {
            raw: RawPackConfig {
                min_count,
                max_count,
                ..RawPackConfig::default()
            },
        }
    }

    pub fn from_ron_str(text: &str) -> PackConfigResult<Self> {
        let raw: RawPackConfig =
            ron::from_str(text).map_err(|err| PackConfigError::Parse(err.to_string()))?;
        Self::try_from(raw)
    }

    /// Accepts the JSON layout of the legacy shop catalog.
    pub fn from_json_str(text: &str) -> PackConfigResult<Self> {
        let raw: RawPackConfig =
            serde_json::from_str(text).map_err(|err| PackConfigError::Parse(err.to_string()))?;
        Self::try_from(raw)
    }

    pub fn min_count(&self) -> u32 {
        self.min_count
    }

    pub fn max_count(&self) -> u32 {
        self.max_count
    }

    pub fn shiny_chance(&self) -> f64 {
        self.shiny_chance
    }

    pub fn legendary_chance(&self) -> f64 {
        self.legendary_chance
    }

    pub fn mega_chance(&self) -> f64 {
        self.mega_chance
    }

    pub fn mega_size(&self) -> u32 {
        self.mega_size
    }

    /// Number of forced legendary draws allowed per pack, if the guarantee is on.
    pub fn guaranteed_rare_count(&self) -> Option<u32> {
        self.guaranteed_rare
    }

    /// Minimum number of shiny-or-legendary creatures per pack, if the guarantee is on.
    pub fn guaranteed_shiny_or_legendary_count(&self) -> Option<u32> {
        self.guaranteed_shiny_or_legendary
    }

    /// Probability that a guaranteed slot is forced legendary.
    pub fn forced_legendary_chance(&self) -> f64 {
        (self.legendary_chance * 2.0).min(1.0)
    }
}

pub struct PackConfigBuilder {
    raw: RawPackConfig,
}

impl PackConfigBuilder {
    pub fn shiny_chance(mut self, chance: f64) -> Self {
        self.raw.shiny_chance = chance;
        self
    }

    pub fn legendary_chance(mut self, chance: f64) -> Self {
        self.raw.legendary_chance = chance;
        self
    }

    pub fn mega(mut self, chance: f64, size: u32) -> Self {
        self.raw.mega_chance = chance;
        self.raw.mega_size = size;
        self
    }

    pub fn guaranteed_rare(mut self, count: u32) -> Self {
        self.raw.guaranteed_rare = true;
        self.raw.guaranteed_rare_count = Some(count);
        self
    }

    pub fn guaranteed_shiny_or_legendary(mut self, count: u32) -> Self {
        self.raw.guaranteed_shiny_or_legendary = true;
        self.raw.guaranteed_shiny_or_legendary_count = Some(count);
        self
    }

    pub fn build(self) -> PackConfigResult<PackConfig> {
        PackConfig::try_from(self.raw)
    }
}

/// Wire shape of a pack configuration. Accepts the legacy catalog key names.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
struct RawPackConfig {
    #[serde(alias = "min_pokemon")]
    min_count: u32,
    #[serde(alias = "max_pokemon")]
    max_count: u32,
    shiny_chance: f64,
    legendary_chance: f64,
    #[serde(default, alias = "mega_pack_chance")]
    mega_chance: f64,
    #[serde(default, alias = "mega_pack_size")]
    mega_size: u32,
    #[serde(default)]
    guaranteed_rare: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    guaranteed_rare_count: Option<u32>,
    #[serde(default, alias = "guaranteed_shiny_or_legendaries")]
    guaranteed_shiny_or_legendary: bool,
    #[serde(
        default,
        alias = "guaranteed_legendary_count",
        skip_serializing_if = "Option::is_none"
    )]
    guaranteed_shiny_or_legendary_count: Option<u32>,
}

fn check_probability(field: &'static str, value: f64) -> PackConfigResult<f64> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(PackConfigError::ProbabilityOutOfRange { field, value })
    }
}

fn check_guarantee(
    field: &'static str,
    enabled: bool,
    count: Option<u32>,
) -> PackConfigResult<Option<u32>> {
    if !enabled {
        return Ok(None);
    }
    match count.unwrap_or(DEFAULT_GUARANTEE_COUNT) {
        0 => Err(PackConfigError::GuaranteeCountZero { field }),
        count => Ok(Some(count)),
    }
}

impl TryFrom<RawPackConfig> for PackConfig {
    type Error = PackConfigError;

    fn try_from(raw: RawPackConfig) -> Result<Self, Self::Error> {
        if raw.min_count > raw.max_count {
            return Err(PackConfigError::MinExceedsMax {
                min: raw.min_count,
                max: raw.max_count,
            });
        }
        let shiny_chance = check_probability("shiny_chance", raw.shiny_chance)?;
        let legendary_chance = check_probability("legendary_chance", raw.legendary_chance)?;
        let mega_chance = check_probability("mega_chance", raw.mega_chance)?;
        if mega_chance > 0.0 && raw.mega_size == 0 {
            return Err(PackConfigError::MegaSizeZero {
                chance: mega_chance,
            });
        }

        Ok(Self {
            min_count: raw.min_count,
            max_count: raw.max_count,
            shiny_chance,
            legendary_chance,
            mega_chance,
            mega_size: raw.mega_size,
            guaranteed_rare: check_guarantee(
                "guaranteed_rare",
                raw.guaranteed_rare,
                raw.guaranteed_rare_count,
            )?,
            guaranteed_shiny_or_legendary: check_guarantee(
                "guaranteed_shiny_or_legendary",
                raw.guaranteed_shiny_or_legendary,
                raw.guaranteed_shiny_or_legendary_count,
            )?,
        })
    }
}

impl From<PackConfig> for RawPackConfig {
    fn from(config: PackConfig) -> Self {
        Self {
            min_count: config.min_count,
            max_count: config.max_count,
            shiny_chance: config.shiny_chance,
            legendary_chance: config.legendary_chance,
            mega_chance: config.mega_chance,
            mega_size: config.mega_size,
            guaranteed_rare: config.guaranteed_rare.is_some(),
            guaranteed_rare_count: config.guaranteed_rare,
            guaranteed_shiny_or_legendary: config.guaranteed_shiny_or_legendary.is_some(),
            guaranteed_shiny_or_legendary_count: config.guaranteed_shiny_or_legendary,
        }
    }
}

/// A named pack tier as sold in the shop.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PackTier {
    pub name: String,
    pub price: u32,
    pub config: PackConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PackCatalog {
    tiers: Vec<PackTier>,
}

impl PackCatalog {
    /// The five tiers shipped with the crate.
    pub fn bundled() -> &'static PackCatalog {
        &BUNDLED_PACKS
    }

    /// Invalid tiers surface as a parse error carrying the validation message.
    pub fn from_ron_str(text: &str) -> PackConfigResult<Self> {
        ron::from_str(text).map_err(|err| PackConfigError::Parse(err.to_string()))
    }

    /// Look up a tier by name, ignoring case.
    pub fn tier(&self, name: &str) -> PackConfigResult<&PackTier> {
        self.tiers
            .iter()
            .find(|tier| tier.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| PackConfigError::UnknownTier(name.to_string()))
    }

    pub fn config(&self, name: &str) -> PackConfigResult<&PackConfig> {
        self.tier(name).map(|tier| &tier.config)
    }

    pub fn tiers(&self) -> &[PackTier] {
        &self.tiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_bundled_tiers() {
        let catalog = PackCatalog::bundled();
        let names: Vec<&str> = catalog.tiers().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Basic Pack",
                "Booster Pack",
                "Premium Pack",
                "Elite Trainer Pack",
                "Master Collection"
            ]
        );

        let elite = catalog
            .config("elite trainer pack")
            .unwrap_or_else(|err| panic!("{err}"));
        assert_eq!((elite.min_count(), elite.max_count()), (12, 18));
        assert_eq!(elite.guaranteed_rare_count(), Some(3));
        assert_eq!(elite.mega_size(), 20);

        let premium = catalog.config("Premium Pack").unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(premium.guaranteed_rare_count(), Some(DEFAULT_GUARANTEE_COUNT));

        let master = catalog.config("Master Collection").unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(master.guaranteed_shiny_or_legendary_count(), Some(3));
        assert_eq!(master.forced_legendary_chance(), 1.0);
    }

    #[test]
    fn test_unknown_tier() {
        assert_eq!(
            PackCatalog::bundled().tier("Mystery Box"),
            Err(PackConfigError::UnknownTier("Mystery Box".to_string()))
        );
    }

    #[test]
    fn test_legacy_json_keys_are_accepted() {
        let json = r#"{
            "min_pokemon": 8,
            "max_pokemon": 12,
            "shiny_chance": 0.001,
            "legendary_chance": 0.2,
            "mega_pack_chance": 0.25,
            "mega_pack_size": 15,
            "guaranteed_rare": true
        }"#;

        let config = PackConfig::from_json_str(json).unwrap_or_else(|err| panic!("{err}"));

        assert_eq!(config.max_count(), 12);
        assert_eq!(config.mega_chance(), 0.25);
        assert_eq!(config.guaranteed_rare_count(), Some(1));
    }

    #[rstest]
    #[case(PackConfig::builder(5, 3).build(), PackConfigError::MinExceedsMax { min: 5, max: 3 })]
    #[case(
        PackConfig::builder(1, 3).shiny_chance(1.5).build(),
        PackConfigError::ProbabilityOutOfRange { field: "shiny_chance", value: 1.5 }
    )]
    #[case(
        PackConfig::builder(1, 3).mega(0.2, 0).build(),
        PackConfigError::MegaSizeZero { chance: 0.2 }
    )]
    #[case(
        PackConfig::builder(1, 3).guaranteed_rare(0).build(),
        PackConfigError::GuaranteeCountZero { field: "guaranteed_rare" }
    )]
    fn test_invalid_configs_are_rejected(
        #[case] result: PackConfigResult<PackConfig>,
        #[case] expected: PackConfigError,
    ) {
        assert_eq!(result, Err(expected));
    }

    #[test]
    fn test_nan_probability_is_rejected() {
        let result = PackConfig::builder(1, 3).legendary_chance(f64::NAN).build();
        assert!(matches!(
            result,
            Err(PackConfigError::ProbabilityOutOfRange { field: "legendary_chance", .. })
        ));
    }

    #[test]
    fn test_missing_required_field_fails_to_parse() {
        let result = PackConfig::from_ron_str("(min_count: 1, max_count: 3, shiny_chance: 0.01)");
        assert!(matches!(result, Err(PackConfigError::Parse(_))));
    }

    #[test]
    fn test_invalid_values_fail_at_load() {
        let result = PackConfig::from_json_str(
            r#"{"min_count": 9, "max_count": 3, "shiny_chance": 0.0, "legendary_chance": 0.0}"#,
        );
        assert_eq!(result, Err(PackConfigError::MinExceedsMax { min: 9, max: 3 }));
    }

    #[test]
    fn test_invalid_tier_fails_catalog_load() {
        let text = r#"(tiers: [(name: "Broken", price: 1, config: (
            min_count: 1, max_count: 2, shiny_chance: 2.0, legendary_chance: 0.0,
        ))])"#;

        let result = PackCatalog::from_ron_str(text);

        assert!(matches!(
            result,
            Err(PackConfigError::Parse(message)) if message.contains("shiny_chance")
        ));
    }
}
