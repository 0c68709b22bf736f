use rust_decimal::Decimal;

use super::{BracketTable, SocialInsuranceRates};

/// Everything the evaluator needs besides the scenario itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxPolicy {
    /// Table for annual comprehensive (salary) taxable income.
    pub salary_brackets: BracketTable,
    /// Table for the separately taxed annual one-time bonus.
    pub bonus_brackets: BracketTable,
    /// Annual basic deduction subtracted before the salary table applies.
    pub standard_deduction: Decimal,
    pub social_insurance_rates: SocialInsuranceRates,
}

impl Default for TaxPolicy {
    /// The 2019 PRC individual income tax rules.
    fn default() -> Self {
        Self {
            salary_brackets: BracketTable::comprehensive_2019(),
            bonus_brackets: BracketTable::annual_bonus_2019(),
            standard_deduction: Decimal::from(60_000),
            social_insurance_rates: SocialInsuranceRates::default(),
        }
    }
}
