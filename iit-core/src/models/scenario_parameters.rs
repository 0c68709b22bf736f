use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One salary-structure assumption to evaluate.
///
/// Amounts are monthly; callers are expected to reject or clamp negative
/// values before evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioParameters {
    pub base_salary: Decimal,
    pub performance_salary: Decimal,
    /// Bonus expressed in months of the bonus base.
    pub bonus_base_months: Decimal,
    /// Performance rating applied on top of the bonus months (1.0 = standard).
    pub performance_multiplier: Decimal,
    /// Contribution cap for pension, medical and unemployment insurance.
    pub social_insurance_base: Decimal,
    /// Contribution cap for the housing provident fund.
    pub housing_fund_base: Decimal,
    /// Special additional deductions (children's education, mortgage
    /// interest, elderly support, ...) per month.
    pub additional_deductions: Decimal,
    /// Whether the bonus base includes performance pay or only base pay.
    pub include_performance_in_bonus: bool,
}

impl Default for ScenarioParameters {
    fn default() -> Self {
        Self {
            base_salary: Decimal::from(15_000),
            performance_salary: Decimal::from(8_000),
            bonus_base_months: Decimal::ONE,
            performance_multiplier: Decimal::new(15, 1),
            social_insurance_base: Decimal::from(4_775),
            housing_fund_base: Decimal::from(2_520),
            additional_deductions: Decimal::ZERO,
            include_performance_in_bonus: true,
        }
    }
}

impl ScenarioParameters {
    pub fn monthly_salary(&self) -> Decimal {
        self.base_salary + self.performance_salary
    }

    /// Copy of these parameters with a different base/performance split.
    pub fn with_salary(
        &self,
        base_salary: Decimal,
        performance_salary: Decimal,
    ) -> Self {
        Self {
            base_salary,
            performance_salary,
            ..self.clone()
        }
    }

    /// Largest monthly amount or contribution cap accepted from input.
    pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);
    pub const MAX_BONUS_MONTHS: Decimal = Decimal::from_parts(120, 0, 0, false, 0);
    pub const MAX_MULTIPLIER: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

    /// Each numeric field with its name and accepted upper bound.
    fn bounded_fields(&self) -> [(&'static str, Decimal, Decimal); 7] {
        [
            ("base_salary", self.base_salary, Self::MAX_AMOUNT),
            ("performance_salary", self.performance_salary, Self::MAX_AMOUNT),
            ("bonus_base_months", self.bonus_base_months, Self::MAX_BONUS_MONTHS),
            ("performance_multiplier", self.performance_multiplier, Self::MAX_MULTIPLIER),
            ("social_insurance_base", self.social_insurance_base, Self::MAX_AMOUNT),
            ("housing_fund_base", self.housing_fund_base, Self::MAX_AMOUNT),
            ("additional_deductions", self.additional_deductions, Self::MAX_AMOUNT),
        ]
    }

    /// Names of monetary fields holding a negative value.
    pub fn negative_fields(&self) -> Vec<&'static str> {
        self.bounded_fields()
            .into_iter()
            .filter(|(_, value, _)| *value < Decimal::ZERO)
            .map(|(name, ..)| name)
            .collect()
    }

    /// Names of fields above their upper bound. Evaluation of parameters
    /// with no negative and no out-of-range fields cannot overflow.
    pub fn out_of_range_fields(&self) -> Vec<&'static str> {
        self.bounded_fields()
            .into_iter()
            .filter(|(_, value, max)| value > max)
            .map(|(name, ..)| name)
            .collect()
    }
}
