//! TOML configuration for the `iit` command.
//!
//! Every section is optional; a missing file section falls back to the
//! defaults below, and command-line flags override whatever is loaded here.
//!
//! ```toml
//! city = "Beijing"
//! brackets_file = "data/brackets_2019.csv"
//!
//! [scenario]
//! base_salary = 20000
//! performance_salary = 5000
//! bonus_base_months = 2
//!
//! [sweep]
//! start = 10000
//! end = 60000
//! step = 500
//!
//! [history]
//! capacity = 20
//!
//! [logging]
//! level = "debug"
//! file = "iit.log"
//! ```

use std::path::{Path, PathBuf};

use iit_core::{ScenarioParameters, SweepRange, SweepRangeError, TaxPolicy};
use iit_data::{BracketLoader, BracketLoaderError, CityPresetError, CityPresetLoader, CityPresets};
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while reading or validating the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("[scenario] has negative values: {}", .0.join(", "))]
    NegativeScenario(Vec<&'static str>),

    #[error("[scenario] has values above their bounds: {}", .0.join(", "))]
    ScenarioOutOfRange(Vec<&'static str>),

    #[error("[history] capacity {capacity} exceeds {max}")]
    HistoryCapacity { capacity: usize, max: usize },

    #[error("[sweep] {0}")]
    Sweep(#[from] SweepRangeError),

    #[error("brackets file: {0}")]
    Brackets(#[from] BracketLoaderError),

    #[error("presets file: {0}")]
    Presets(#[from] CityPresetError),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub capacity: usize,
}

impl HistoryConfig {
    pub const MAX_CAPACITY: usize = 10_000;
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { capacity: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Parameters used when a flag is not given.
    pub scenario: ScenarioParameters,
    /// City preset applied when contribution caps are not given explicitly.
    pub city: Option<String>,
    pub sweep: SweepRange,
    pub history: HistoryConfig,
    pub logging: LoggingConfig,
    /// CSV replacing the built-in bracket tables.
    pub brackets_file: Option<PathBuf>,
    /// CSV replacing the built-in city presets.
    pub presets_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = read(path)?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let negative = self.scenario.negative_fields();
        if !negative.is_empty() {
            return Err(ConfigError::NegativeScenario(negative));
        }
        let too_large = self.scenario.out_of_range_fields();
        if !too_large.is_empty() {
            return Err(ConfigError::ScenarioOutOfRange(too_large));
        }
        self.sweep.validate()?;
        if self.history.capacity > HistoryConfig::MAX_CAPACITY {
            return Err(ConfigError::HistoryCapacity {
                capacity: self.history.capacity,
                max: HistoryConfig::MAX_CAPACITY,
            });
        }
        Ok(())
    }

    /// Tax policy from `brackets_file`, or the built-in 2019 rules.
    pub fn policy(&self) -> Result<TaxPolicy, ConfigError> {
        match &self.brackets_file {
            Some(path) => Ok(BracketLoader::load_policy(read(path)?.as_bytes())?),
            None => Ok(TaxPolicy::default()),
        }
    }

    /// City presets from `presets_file`, or the built-in table.
    pub fn presets(&self) -> Result<CityPresets, ConfigError> {
        match &self.presets_file {
            Some(path) => Ok(CityPresetLoader::parse(read(path)?.as_bytes())?),
            None => Ok(CityPresets::builtin()),
        }
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_file_yields_defaults() {
        let config = AppConfig::from_toml_str("").expect("empty config is valid");

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.history.capacity, 10);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.sweep, SweepRange::default());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let toml = r#"
city = "Beijing"

[scenario]
base_salary = 20000
bonus_base_months = "2"

[sweep]
step = 500

[logging]
level = "debug"
file = "iit.log"
"#;

        let config = AppConfig::from_toml_str(toml).expect("should parse");

        assert_eq!(config.city.as_deref(), Some("Beijing"));
        assert_eq!(config.scenario.base_salary, dec!(20000));
        assert_eq!(config.scenario.bonus_base_months, dec!(2));
        assert_eq!(config.scenario.performance_salary, dec!(8000));
        assert_eq!(config.sweep.step, dec!(500));
        assert_eq!(config.sweep.start, dec!(5000));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, Some(PathBuf::from("iit.log")));
    }

    #[test]
    fn negative_scenario_values_are_rejected() {
        let toml = "[scenario]\nbase_salary = -1\n";

        match AppConfig::from_toml_str(toml) {
            Err(ConfigError::NegativeScenario(fields)) => {
                assert_eq!(fields, vec!["base_salary"]);
            }
            other => panic!("expected NegativeScenario, got {other:?}"),
        }
    }

    #[test]
    fn oversized_scenario_values_are_rejected() {
        let toml = "[scenario]\nbase_salary = \"10000000000000000000000000000\"\nperformance_multiplier = 500\n";

        match AppConfig::from_toml_str(toml) {
            Err(ConfigError::ScenarioOutOfRange(fields)) => {
                assert_eq!(fields, vec!["base_salary", "performance_multiplier"]);
            }
            other => panic!("expected ScenarioOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn oversized_history_capacity_is_rejected() {
        let toml = "[history]\ncapacity = 9000000000000000000\n";

        assert!(matches!(
            AppConfig::from_toml_str(toml),
            Err(ConfigError::HistoryCapacity {
                capacity: 9_000_000_000_000_000_000,
                max: HistoryConfig::MAX_CAPACITY,
            })
        ));
    }

    #[test]
    fn oversized_sweep_is_rejected() {
        let toml = "[sweep]\nstep = 0.00001\n";

        assert!(matches!(
            AppConfig::from_toml_str(toml),
            Err(ConfigError::Sweep(SweepRangeError::TooManyProbes { .. }))
        ));
    }

    #[test]
    fn invalid_sweep_is_rejected() {
        let toml = "[sweep]\nstart = 9000\nend = 1000\n";

        assert!(matches!(
            AppConfig::from_toml_str(toml),
            Err(ConfigError::Sweep(SweepRangeError::StartAfterEnd { .. }))
        ));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            AppConfig::from_toml_str("[scenario\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let path = Path::new("/nonexistent/iit.toml");

        match AppConfig::load(path) {
            Err(ConfigError::Read { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected Read error, got {other:?}"),
        }
    }

    #[test]
    fn defaults_use_builtin_tables() {
        let config = AppConfig::default();

        assert_eq!(config.policy().unwrap(), TaxPolicy::default());
        assert_eq!(config.presets().unwrap(), CityPresets::builtin());
    }
}
