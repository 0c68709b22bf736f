//! Side-by-side comparison of two evaluated scenarios, typically a previous
//! job offer against the current one.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ScenarioResult;

/// Differences `current − previous` for the headline figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioDelta {
    pub monthly_salary: Decimal,
    pub base_salary: Decimal,
    pub performance_salary: Decimal,
    pub bonus: Decimal,
    pub total_income: Decimal,
    pub after_tax_income: Decimal,
    pub conversion_rate: Decimal,
    pub marginal_rate: Decimal,
    pub monthly_with_bonus: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub previous: ScenarioResult,
    pub current: ScenarioResult,
    pub delta: ScenarioDelta,
}

impl ScenarioComparison {
    pub fn between(
        previous: ScenarioResult,
        current: ScenarioResult,
    ) -> Self {
        let delta = ScenarioDelta {
            monthly_salary: current.monthly_salary - previous.monthly_salary,
            base_salary: current.base_salary - previous.base_salary,
            performance_salary: current.performance_salary - previous.performance_salary,
            bonus: current.bonus - previous.bonus,
            total_income: current.total_income - previous.total_income,
            after_tax_income: current.after_tax_income - previous.after_tax_income,
            conversion_rate: current.conversion_rate - previous.conversion_rate,
            marginal_rate: current.marginal_rate - previous.marginal_rate,
            monthly_with_bonus: current.monthly_with_bonus - previous.monthly_with_bonus,
        };

        Self {
            previous,
            current,
            delta,
        }
    }

    /// Whether the current scenario takes home more per year.
    pub fn is_improvement(&self) -> bool {
        self.delta.after_tax_income > Decimal::ZERO
    }
}
