//! Scenario evaluation: one salary structure in, one take-home summary out.
//!
//! # Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Monthly salary = base + performance; annual salary = monthly × 12 |
//! | 2    | Bonus base = base + performance, or base only when performance pay is excluded |
//! | 3    | Bonus = bonus base × bonus months × performance multiplier |
//! | 4    | Social insurance and housing fund on the monthly salary |
//! | 5    | Taxable income = max(0, annual salary − standard deduction − annual social insurance − additional deductions × 12) |
//! | 6    | Salary tax on taxable income; bonus tax on the bonus (zero when there is no bonus) |
//! | 7    | After-tax income = salary + bonus − social insurance − total tax |
//! | 8    | Conversion rate = after-tax ÷ pre-tax (zero when pre-tax is zero) |
//! | 9    | Marginal rate = rate of the salary bracket containing taxable income |
//! | 10   | Monthly take-home excluding and including the bonus |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use iit_core::{ScenarioEvaluator, ScenarioParameters, TaxPolicy};
//!
//! let policy = TaxPolicy::default();
//! let evaluator = ScenarioEvaluator::new(&policy);
//!
//! let result = evaluator.evaluate(&ScenarioParameters {
//!     base_salary: dec!(15000),
//!     performance_salary: dec!(8000),
//!     bonus_base_months: dec!(1.0),
//!     performance_multiplier: dec!(1.5),
//!     social_insurance_base: dec!(4775),
//!     housing_fund_base: dec!(2520),
//!     additional_deductions: dec!(0),
//!     include_performance_in_bonus: true,
//! });
//!
//! assert_eq!(result.bonus, dec!(34500));
//! assert_eq!(result.taxable_income, dec!(208643.40));
//! assert_eq!(result.total_tax, dec!(25843.68));
//! assert_eq!(result.after_tax_income, dec!(277299.72));
//! assert_eq!(result.marginal_rate, dec!(0.20));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{annualize, max, per_month};
use crate::calculations::progressive_tax::{annual_bonus_tax, marginal_rate, salary_tax};
use crate::calculations::social_insurance::SocialInsuranceCalculator;
use crate::{ScenarioParameters, ScenarioResult, TaxPolicy};

/// Evaluates salary scenarios against a fixed [`TaxPolicy`].
///
/// Evaluation is pure: the same parameters always produce an equal result.
#[derive(Debug, Clone)]
pub struct ScenarioEvaluator<'a> {
    policy: &'a TaxPolicy,
    social_insurance: SocialInsuranceCalculator,
}

impl<'a> ScenarioEvaluator<'a> {
    pub fn new(policy: &'a TaxPolicy) -> Self {
        Self {
            policy,
            social_insurance: SocialInsuranceCalculator::new(
                policy.social_insurance_rates.clone(),
            ),
        }
    }

    pub fn policy(&self) -> &TaxPolicy {
        self.policy
    }

    /// Produces the complete [`ScenarioResult`] for `params`.
    ///
    /// Inputs are expected to be non-negative; the taxable income is floored
    /// at zero so the tax schedules stay well defined.
    pub fn evaluate(
        &self,
        params: &ScenarioParameters,
    ) -> ScenarioResult {
        let monthly_salary = params.monthly_salary();
        let annual_salary = annualize(monthly_salary);

        let bonus_base = self.bonus_base(params);
        let bonus = self.bonus(bonus_base, params);

        let social_insurance = self.social_insurance.calculate(
            monthly_salary,
            params.social_insurance_base,
            params.housing_fund_base,
        );

        let taxable_income = self.taxable_income(
            annual_salary,
            social_insurance.annual_total,
            params.additional_deductions,
        );

        let salary_tax = salary_tax(&self.policy.salary_brackets, taxable_income);
        let bonus_tax = self.bonus_tax(bonus);
        let total_tax = salary_tax + bonus_tax;

        let total_income = annual_salary + bonus;
        let after_tax_income = total_income - social_insurance.annual_total - total_tax;
        let conversion_rate = self.conversion_rate(after_tax_income, total_income);
        let marginal_rate = marginal_rate(&self.policy.salary_brackets, taxable_income);

        let monthly_without_bonus =
            per_month(annual_salary - social_insurance.annual_total - salary_tax);
        let monthly_with_bonus = per_month(after_tax_income);

        debug!(
            %monthly_salary,
            %bonus,
            %taxable_income,
            %total_tax,
            %after_tax_income,
            "evaluated scenario"
        );

        ScenarioResult {
            base_salary: params.base_salary,
            performance_salary: params.performance_salary,
            bonus_base_months: params.bonus_base_months,
            performance_multiplier: params.performance_multiplier,
            monthly_salary,
            annual_salary,
            bonus_base,
            bonus,
            total_income,
            social_insurance,
            taxable_income,
            salary_tax,
            bonus_tax,
            total_tax,
            after_tax_income,
            conversion_rate,
            marginal_rate,
            monthly_without_bonus,
            monthly_with_bonus,
        }
    }

    /// Monthly pay the bonus is expressed in.
    fn bonus_base(
        &self,
        params: &ScenarioParameters,
    ) -> Decimal {
        if params.include_performance_in_bonus {
            params.base_salary + params.performance_salary
        } else {
            params.base_salary
        }
    }

    fn bonus(
        &self,
        bonus_base: Decimal,
        params: &ScenarioParameters,
    ) -> Decimal {
        bonus_base * params.bonus_base_months * params.performance_multiplier
    }

    fn taxable_income(
        &self,
        annual_salary: Decimal,
        annual_social_insurance: Decimal,
        monthly_additional_deductions: Decimal,
    ) -> Decimal {
        max(
            annual_salary
                - self.policy.standard_deduction
                - annual_social_insurance
                - annualize(monthly_additional_deductions),
            Decimal::ZERO,
        )
    }

    /// The bonus schedule is only consulted for a positive bonus.
    fn bonus_tax(
        &self,
        bonus: Decimal,
    ) -> Decimal {
        if bonus > Decimal::ZERO {
            annual_bonus_tax(&self.policy.bonus_brackets, bonus)
        } else {
            Decimal::ZERO
        }
    }

    fn conversion_rate(
        &self,
        after_tax_income: Decimal,
        total_income: Decimal,
    ) -> Decimal {
        if total_income > Decimal::ZERO {
            after_tax_income / total_income
        } else {
            Decimal::ZERO
        }
    }
}
