//! Salary sweeps for curve plotting.
//!
//! A sweep re-evaluates a scenario at every monthly salary in a
//! [`SweepRange`], rescaling base and performance pay so their ratio stays
//! the same as in the original parameters. When both are zero the probe is
//! split evenly between them. Everything else (bonus months, multiplier,
//! caps, deductions) is held fixed.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::per_month;
use crate::calculations::scenario::ScenarioEvaluator;
use crate::{ScenarioParameters, SweepRange, SweepRangeError, SweepRow};

#[derive(Debug, Clone)]
pub struct SweepGenerator<'a> {
    evaluator: &'a ScenarioEvaluator<'a>,
    range: SweepRange,
}

impl<'a> SweepGenerator<'a> {
    /// # Errors
    ///
    /// Returns [`SweepRangeError`] when the range cannot produce an ascending
    /// finite sequence of probes.
    pub fn new(
        evaluator: &'a ScenarioEvaluator<'a>,
        range: SweepRange,
    ) -> Result<Self, SweepRangeError> {
        range.validate()?;
        Ok(Self { evaluator, range })
    }

    pub fn range(&self) -> &SweepRange {
        &self.range
    }

    /// Lazily yields one row per probe, in ascending salary order.
    pub fn iter<'s>(
        &'s self,
        params: &'s ScenarioParameters,
    ) -> impl Iterator<Item = SweepRow> + 's {
        self.range
            .probes()
            .map(move |salary| self.row(params, salary))
    }

    /// Materializes the full sweep table.
    pub fn generate(
        &self,
        params: &ScenarioParameters,
    ) -> Vec<SweepRow> {
        let rows: Vec<SweepRow> = self.iter(params).collect();
        debug!(
            rows = rows.len(),
            start = %self.range.start,
            end = %self.range.end,
            step = %self.range.step,
            "generated salary sweep"
        );
        rows
    }

    fn row(
        &self,
        params: &ScenarioParameters,
        monthly_salary: Decimal,
    ) -> SweepRow {
        let (base_salary, performance_salary) = split_salary(params, monthly_salary);
        let result = self
            .evaluator
            .evaluate(&params.with_salary(base_salary, performance_salary));

        SweepRow {
            monthly_salary,
            base_salary,
            performance_salary,
            after_tax_income: result.after_tax_income,
            conversion_rate: result.conversion_rate,
            marginal_rate: result.marginal_rate,
            monthly_tax: per_month(result.total_tax),
            monthly_social_insurance: result.social_insurance.monthly_total,
            monthly_without_bonus: result.monthly_without_bonus,
            monthly_with_bonus: result.monthly_with_bonus,
        }
    }
}

/// Splits `monthly_salary` into base and performance pay in the same ratio as
/// `params`. The performance share is the remainder, so the two always add
/// back up to the probe exactly.
fn split_salary(
    params: &ScenarioParameters,
    monthly_salary: Decimal,
) -> (Decimal, Decimal) {
    let current = params.monthly_salary();
    if current > Decimal::ZERO {
        let base = params.base_salary * monthly_salary / current;
        (base, monthly_salary - base)
    } else {
        let half = monthly_salary / Decimal::TWO;
        (half, monthly_salary - half)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::TaxPolicy;

    fn small_range() -> SweepRange {
        SweepRange {
            start: dec!(5000),
            end: dec!(10000),
            step: dec!(1000),
        }
    }

    // =========================================================================
    // split_salary tests
    // =========================================================================

    #[test]
    fn split_salary_preserves_ratio() {
        let params = ScenarioParameters {
            base_salary: dec!(6000),
            performance_salary: dec!(4000),
            ..ScenarioParameters::default()
        };

        assert_eq!(split_salary(&params, dec!(20000)), (dec!(12000), dec!(8000)));
    }

    #[test]
    fn split_salary_always_sums_to_probe() {
        let params = ScenarioParameters::default();

        let (base, performance) = split_salary(&params, dec!(7000));

        assert_eq!(base + performance, dec!(7000));
    }

    #[test]
    fn split_salary_halves_when_structure_is_empty() {
        let params = ScenarioParameters {
            base_salary: dec!(0),
            performance_salary: dec!(0),
            ..ScenarioParameters::default()
        };

        assert_eq!(split_salary(&params, dec!(9000)), (dec!(4500), dec!(4500)));
    }

    #[test]
    fn split_salary_keeps_all_base_when_no_performance() {
        let params = ScenarioParameters {
            base_salary: dec!(8000),
            performance_salary: dec!(0),
            ..ScenarioParameters::default()
        };

        assert_eq!(split_salary(&params, dec!(15000)), (dec!(15000), dec!(0)));
    }

    // =========================================================================
    // generate tests
    // =========================================================================

    #[test]
    fn new_rejects_invalid_range() {
        let policy = TaxPolicy::default();
        let evaluator = ScenarioEvaluator::new(&policy);
        let range = SweepRange {
            step: dec!(0),
            ..small_range()
        };

        let result = SweepGenerator::new(&evaluator, range);

        assert_eq!(
            result.err(),
            Some(SweepRangeError::NonPositiveStep(dec!(0)))
        );
    }

    #[test]
    fn new_rejects_oversized_range_before_generating() {
        let policy = TaxPolicy::default();
        let evaluator = ScenarioEvaluator::new(&policy);
        let range = SweepRange {
            step: dec!(0.00001),
            ..SweepRange::default()
        };

        let result = SweepGenerator::new(&evaluator, range);

        assert_eq!(
            result.err(),
            Some(SweepRangeError::TooManyProbes {
                step: dec!(0.00001),
                max: SweepRange::MAX_PROBES
            })
        );
    }

    #[test]
    fn generate_one_row_per_probe_in_ascending_order() {
        let policy = TaxPolicy::default();
        let evaluator = ScenarioEvaluator::new(&policy);
        let sweep = SweepGenerator::new(&evaluator, small_range()).unwrap();

        let rows = sweep.generate(&ScenarioParameters::default());

        let salaries: Vec<_> = rows.iter().map(|r| r.monthly_salary).collect();
        assert_eq!(
            salaries,
            vec![
                dec!(5000),
                dec!(6000),
                dec!(7000),
                dec!(8000),
                dec!(9000),
                dec!(10000)
            ]
        );
    }

    #[test]
    fn generate_default_range_has_expected_size() {
        let policy = TaxPolicy::default();
        let evaluator = ScenarioEvaluator::new(&policy);
        let sweep = SweepGenerator::new(&evaluator, SweepRange::default()).unwrap();

        let rows = sweep.generate(&ScenarioParameters::default());

        assert_eq!(rows.len(), sweep.range().probe_count());
        assert_eq!(rows.first().map(|r| r.monthly_salary), Some(dec!(5000)));
        assert_eq!(rows.last().map(|r| r.monthly_salary), Some(dec!(100000)));
    }

    #[test]
    fn generate_row_matches_direct_evaluation() {
        let policy = TaxPolicy::default();
        let evaluator = ScenarioEvaluator::new(&policy);
        let sweep = SweepGenerator::new(&evaluator, small_range()).unwrap();
        let params = ScenarioParameters {
            base_salary: dec!(6000),
            performance_salary: dec!(4000),
            ..ScenarioParameters::default()
        };

        let rows = sweep.generate(&params);
        let row = rows
            .iter()
            .find(|r| r.monthly_salary == dec!(10000))
            .unwrap();
        let direct = evaluator.evaluate(&params);

        assert_eq!(row.base_salary, dec!(6000));
        assert_eq!(row.performance_salary, dec!(4000));
        assert_eq!(row.after_tax_income, direct.after_tax_income);
        assert_eq!(row.conversion_rate, direct.conversion_rate);
        assert_eq!(row.marginal_rate, direct.marginal_rate);
        assert_eq!(row.monthly_tax, direct.total_tax / dec!(12));
        assert_eq!(
            row.monthly_social_insurance,
            direct.social_insurance.annual_total / dec!(12)
        );
    }

    #[test]
    fn generate_splits_evenly_for_zero_structure() {
        let policy = TaxPolicy::default();
        let evaluator = ScenarioEvaluator::new(&policy);
        let sweep = SweepGenerator::new(&evaluator, small_range()).unwrap();
        let params = ScenarioParameters {
            base_salary: dec!(0),
            performance_salary: dec!(0),
            ..ScenarioParameters::default()
        };

        let rows = sweep.generate(&params);

        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].base_salary, dec!(2500));
        assert_eq!(rows[0].performance_salary, dec!(2500));
    }

    #[test]
    fn generate_is_deterministic() {
        let policy = TaxPolicy::default();
        let evaluator = ScenarioEvaluator::new(&policy);
        let sweep = SweepGenerator::new(&evaluator, small_range()).unwrap();
        let params = ScenarioParameters::default();

        assert_eq!(sweep.generate(&params), sweep.generate(&params));
    }

    #[test]
    fn iter_is_lazy_and_restartable() {
        let policy = TaxPolicy::default();
        let evaluator = ScenarioEvaluator::new(&policy);
        let sweep = SweepGenerator::new(&evaluator, SweepRange::default()).unwrap();
        let params = ScenarioParameters::default();

        let first_two: Vec<_> = sweep.iter(&params).take(2).collect();
        let again: Vec<_> = sweep.iter(&params).take(2).collect();

        assert_eq!(first_two.len(), 2);
        assert_eq!(first_two, again);
    }

    #[test]
    fn after_tax_income_rises_with_salary() {
        let policy = TaxPolicy::default();
        let evaluator = ScenarioEvaluator::new(&policy);
        let sweep = SweepGenerator::new(&evaluator, SweepRange::default()).unwrap();

        let rows = sweep.generate(&ScenarioParameters {
            bonus_base_months: dec!(0),
            ..ScenarioParameters::default()
        });

        for pair in rows.windows(2) {
            assert!(pair[1].after_tax_income > pair[0].after_tax_income);
        }
    }
}
