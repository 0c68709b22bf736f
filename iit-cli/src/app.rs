//! Session wiring between the command line, the configuration and the core
//! calculations.

use iit_core::{
    ScenarioComparison, ScenarioEvaluator, ScenarioParameters, SweepGenerator, SweepRange,
    SweepRangeError, SweepRow, TaxPolicy,
};
use iit_data::{CityPresetError, CityPresets};
use rust_decimal::Decimal;
use tracing::info;

use crate::config::{AppConfig, ConfigError};
use crate::csv_loader::LabeledScenario;
use crate::history::{HistoryEntry, ScenarioHistory};

/// Values given on the command line. `None` keeps the configured value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioOverrides {
    pub city: Option<String>,
    pub base_salary: Option<Decimal>,
    pub performance_salary: Option<Decimal>,
    pub bonus_base_months: Option<Decimal>,
    pub performance_multiplier: Option<Decimal>,
    pub social_insurance_base: Option<Decimal>,
    pub housing_fund_base: Option<Decimal>,
    pub additional_deductions: Option<Decimal>,
    pub exclude_performance_from_bonus: bool,
}

/// The earlier job in a comparison. Unset fields are taken from the current
/// scenario.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviousOverrides {
    pub base_salary: Option<Decimal>,
    pub performance_salary: Option<Decimal>,
    pub bonus_base_months: Option<Decimal>,
    pub performance_multiplier: Option<Decimal>,
}

impl PreviousOverrides {
    pub fn apply(
        &self,
        current: &ScenarioParameters,
    ) -> ScenarioParameters {
        ScenarioParameters {
            base_salary: self.base_salary.unwrap_or(current.base_salary),
            performance_salary: self.performance_salary.unwrap_or(current.performance_salary),
            bonus_base_months: self.bonus_base_months.unwrap_or(current.bonus_base_months),
            performance_multiplier: self
                .performance_multiplier
                .unwrap_or(current.performance_multiplier),
            ..current.clone()
        }
    }
}

/// Parameters ready for evaluation, with the city whose caps they carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedScenario {
    pub city: Option<String>,
    pub parameters: ScenarioParameters,
}

pub struct Session {
    config: AppConfig,
    policy: TaxPolicy,
    presets: CityPresets,
    history: ScenarioHistory,
}

impl Session {
    /// Loads the policy and presets named by `config`.
    pub fn new(config: AppConfig) -> Result<Self, ConfigError> {
        let policy = config.policy()?;
        let presets = config.presets()?;
        let history = ScenarioHistory::new(config.history.capacity);

        Ok(Self {
            config,
            policy,
            presets,
            history,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn policy(&self) -> &TaxPolicy {
        &self.policy
    }

    pub fn presets(&self) -> &CityPresets {
        &self.presets
    }

    pub fn history(&self) -> &ScenarioHistory {
        &self.history
    }

    /// Layers configured defaults, then city caps, then explicit flags.
    pub fn resolve(
        &self,
        overrides: &ScenarioOverrides,
    ) -> Result<ResolvedScenario, CityPresetError> {
        let mut params = self.config.scenario.clone();

        let city = match overrides.city.as_deref().or(self.config.city.as_deref()) {
            Some(name) => {
                let preset = self.presets.find(name)?;
                params = preset.apply_to(&params);
                Some(preset.name.clone())
            }
            None => None,
        };

        let ScenarioOverrides {
            base_salary,
            performance_salary,
            bonus_base_months,
            performance_multiplier,
            social_insurance_base,
            housing_fund_base,
            additional_deductions,
            exclude_performance_from_bonus,
            ..
        } = overrides;

        for (target, value) in [
            (&mut params.base_salary, base_salary),
            (&mut params.performance_salary, performance_salary),
            (&mut params.bonus_base_months, bonus_base_months),
            (&mut params.performance_multiplier, performance_multiplier),
            (&mut params.social_insurance_base, social_insurance_base),
            (&mut params.housing_fund_base, housing_fund_base),
            (&mut params.additional_deductions, additional_deductions),
        ] {
            if let Some(value) = value {
                *target = *value;
            }
        }
        if *exclude_performance_from_bonus {
            params.include_performance_in_bonus = false;
        }

        Ok(ResolvedScenario {
            city,
            parameters: params,
        })
    }

    /// Evaluates and records the scenario in the session history.
    pub fn evaluate(
        &mut self,
        label: Option<String>,
        parameters: ScenarioParameters,
    ) -> &HistoryEntry {
        let result = ScenarioEvaluator::new(&self.policy).evaluate(&parameters);
        self.history.record(label, parameters, result)
    }

    /// Configured sweep range with any of its bounds replaced.
    pub fn sweep_range(
        &self,
        start: Option<Decimal>,
        end: Option<Decimal>,
        step: Option<Decimal>,
    ) -> SweepRange {
        let configured = &self.config.sweep;
        SweepRange {
            start: start.unwrap_or(configured.start),
            end: end.unwrap_or(configured.end),
            step: step.unwrap_or(configured.step),
        }
    }

    pub fn sweep(
        &self,
        parameters: &ScenarioParameters,
        range: SweepRange,
    ) -> Result<Vec<SweepRow>, SweepRangeError> {
        let evaluator = ScenarioEvaluator::new(&self.policy);
        let rows = SweepGenerator::new(&evaluator, range)?.generate(parameters);
        Ok(rows)
    }

    pub fn compare(
        &self,
        previous: &ScenarioParameters,
        current: &ScenarioParameters,
    ) -> ScenarioComparison {
        let evaluator = ScenarioEvaluator::new(&self.policy);
        ScenarioComparison::between(evaluator.evaluate(previous), evaluator.evaluate(current))
    }

    /// Evaluates each scenario in order, recording all of them. Returns how
    /// many were evaluated.
    pub fn run_batch(
        &mut self,
        scenarios: Vec<LabeledScenario>,
    ) -> usize {
        let count = scenarios.len();
        for scenario in scenarios {
            self.evaluate(scenario.label, scenario.parameters);
        }
        info!(count, kept = self.history.len(), "batch evaluated");
        count
    }
}
