use std::io::Read;

use iit_core::ScenarioParameters;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when resolving or loading city presets.
#[derive(Debug, Error)]
pub enum CityPresetError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("unknown city '{name}'; available: {available:?}")]
    UnknownCity {
        name: String,
        available: Vec<String>,
    },

    #[error("city '{0}' is listed more than once")]
    DuplicateCity(String),

    #[error("city '{name}' has a negative {field}: {value}")]
    NegativeBase {
        name: String,
        field: &'static str,
        value: Decimal,
    },

    #[error("city '{name}' has {field} {value} above the largest accepted cap {max}")]
    BaseTooLarge {
        name: String,
        field: &'static str,
        value: Decimal,
        max: Decimal,
    },
}

impl From<csv::Error> for CityPresetError {
    fn from(err: csv::Error) -> Self {
        CityPresetError::CsvParse(err.to_string())
    }
}

/// Social insurance and housing fund contribution bases for one city.
///
/// CSV columns:
/// - `name`: English city name, matched case-insensitively
/// - `alias`: optional local name (e.g. `深圳`), matched exactly
/// - `social_insurance_base`: monthly cap for pension, medical, unemployment
/// - `housing_fund_base`: monthly cap for the housing fund
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityPreset {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub alias: Option<String>,
    pub social_insurance_base: Decimal,
    pub housing_fund_base: Decimal,
}

fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

impl CityPreset {
    fn new(
        name: &str,
        alias: &str,
        social_insurance_base: i64,
        housing_fund_base: i64,
    ) -> Self {
        Self {
            name: name.to_string(),
            alias: Some(alias.to_string()),
            social_insurance_base: Decimal::from(social_insurance_base),
            housing_fund_base: Decimal::from(housing_fund_base),
        }
    }

    pub fn matches(
        &self,
        query: &str,
    ) -> bool {
        let query = query.trim();
        self.name.eq_ignore_ascii_case(query) || self.alias.as_deref() == Some(query)
    }

    /// Copy of `params` with this city's contribution caps.
    pub fn apply_to(
        &self,
        params: &ScenarioParameters,
    ) -> ScenarioParameters {
        ScenarioParameters {
            social_insurance_base: self.social_insurance_base,
            housing_fund_base: self.housing_fund_base,
            ..params.clone()
        }
    }
}

/// Lookup table of named city presets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityPresets {
    presets: Vec<CityPreset>,
}

impl Default for CityPresets {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CityPresets {
    /// Minimum contribution bases bundled with the application.
    pub fn builtin() -> Self {
        Self {
            presets: vec![
                CityPreset::new("Shenzhen", "深圳", 4_775, 2_520),
                CityPreset::new("Beijing", "北京", 6_326, 2_770),
                CityPreset::new("Shanghai", "上海", 5_975, 2_590),
                CityPreset::new("Guangzhou", "广州", 4_588, 2_300),
                CityPreset::new("Hangzhou", "杭州", 3_957, 2_010),
                CityPreset::new("Chengdu", "成都", 3_726, 1_780),
            ],
        }
    }

    /// Builds a table, rejecting duplicate names and negative bases.
    pub fn new(presets: Vec<CityPreset>) -> Result<Self, CityPresetError> {
        for (index, preset) in presets.iter().enumerate() {
            for (field, value) in [
                ("social_insurance_base", preset.social_insurance_base),
                ("housing_fund_base", preset.housing_fund_base),
            ] {
                if value < Decimal::ZERO {
                    return Err(CityPresetError::NegativeBase {
                        name: preset.name.clone(),
                        field,
                        value,
                    });
                }
                if value > ScenarioParameters::MAX_AMOUNT {
                    return Err(CityPresetError::BaseTooLarge {
                        name: preset.name.clone(),
                        field,
                        value,
                        max: ScenarioParameters::MAX_AMOUNT,
                    });
                }
            }
            if presets[..index]
                .iter()
                .any(|p| p.name.eq_ignore_ascii_case(&preset.name))
            {
                return Err(CityPresetError::DuplicateCity(preset.name.clone()));
            }
        }
        Ok(Self { presets })
    }

    /// Resolves a city by English name or alias.
    pub fn find(
        &self,
        name: &str,
    ) -> Result<&CityPreset, CityPresetError> {
        self.presets
            .iter()
            .find(|p| p.matches(name))
            .ok_or_else(|| CityPresetError::UnknownCity {
                name: name.to_string(),
                available: self.names(),
            })
    }

    pub fn names(&self) -> Vec<String> {
        self.presets.iter().map(|p| p.name.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CityPreset> {
        self.presets.iter()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

/// Reads city presets from CSV.
pub struct CityPresetLoader;

impl CityPresetLoader {
    /// Parses a preset table from any reader, trimming whitespace around
    /// values.
    pub fn parse<R: Read>(reader: R) -> Result<CityPresets, CityPresetError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut presets = Vec::new();
        for result in csv_reader.deserialize() {
            let preset: CityPreset = result?;
            presets.push(preset);
        }

        tracing::debug!(count = presets.len(), "parsed city presets");
        CityPresets::new(presets)
    }
}
