use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::SocialInsuranceContribution;

/// Everything derived from one [`ScenarioParameters`](super::ScenarioParameters).
///
/// Annual figures unless the field name says otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    // Echoed inputs
    pub base_salary: Decimal,
    pub performance_salary: Decimal,
    pub bonus_base_months: Decimal,
    pub performance_multiplier: Decimal,

    // Gross pay
    pub monthly_salary: Decimal,
    pub annual_salary: Decimal,
    pub bonus_base: Decimal,
    pub bonus: Decimal,
    /// Pre-tax annual income: salary plus bonus.
    pub total_income: Decimal,

    // Withholdings
    pub social_insurance: SocialInsuranceContribution,
    pub taxable_income: Decimal,
    pub salary_tax: Decimal,
    pub bonus_tax: Decimal,
    pub total_tax: Decimal,

    // Take-home
    pub after_tax_income: Decimal,
    /// After-tax income over pre-tax income; zero when there is no income.
    pub conversion_rate: Decimal,
    /// Rate of the salary bracket that contains the taxable income.
    pub marginal_rate: Decimal,
    pub monthly_without_bonus: Decimal,
    pub monthly_with_bonus: Decimal,
}

/// Where pre-tax annual income goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeComposition {
    pub after_tax_income: Decimal,
    pub income_tax: Decimal,
    pub social_insurance: Decimal,
}

/// Monthly view of pay and deductions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyStructure {
    pub base_salary: Decimal,
    pub performance_salary: Decimal,
    pub social_insurance: Decimal,
    pub income_tax: Decimal,
    pub take_home: Decimal,
}

/// How the annual bonus was derived and taxed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusDetail {
    pub bonus_base_months: Decimal,
    pub performance_multiplier: Decimal,
    pub bonus_base: Decimal,
    pub bonus: Decimal,
    pub bonus_tax: Decimal,
    pub bonus_after_tax: Decimal,
}

impl ScenarioResult {
    pub fn income_composition(&self) -> IncomeComposition {
        IncomeComposition {
            after_tax_income: self.after_tax_income,
            income_tax: self.total_tax,
            social_insurance: self.social_insurance.annual_total,
        }
    }

    pub fn monthly_structure(&self) -> MonthlyStructure {
        let months = Decimal::from(12);
        MonthlyStructure {
            base_salary: self.base_salary,
            performance_salary: self.performance_salary,
            social_insurance: self.social_insurance.monthly_total,
            income_tax: self.total_tax / months,
            take_home: self.monthly_without_bonus,
        }
    }

    pub fn bonus_detail(&self) -> BonusDetail {
        BonusDetail {
            bonus_base_months: self.bonus_base_months,
            performance_multiplier: self.performance_multiplier,
            bonus_base: self.bonus_base,
            bonus: self.bonus,
            bonus_tax: self.bonus_tax,
            bonus_after_tax: self.bonus - self.bonus_tax,
        }
    }
}
