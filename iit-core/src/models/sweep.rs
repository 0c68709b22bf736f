use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ScenarioParameters;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SweepRangeError {
    #[error("sweep step must be positive, got {0}")]
    NonPositiveStep(Decimal),

    #[error("sweep start must be non-negative, got {0}")]
    NegativeStart(Decimal),

    #[error("sweep start {start} exceeds end {end}")]
    StartAfterEnd { start: Decimal, end: Decimal },

    #[error("sweep end {end} exceeds the largest accepted salary {max}")]
    EndTooLarge { end: Decimal, max: Decimal },

    #[error("sweep step {step} yields more than {max} probes")]
    TooManyProbes { step: Decimal, max: usize },
}

/// Inclusive range of monthly salaries probed by a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepRange {
    pub start: Decimal,
    pub end: Decimal,
    pub step: Decimal,
}

impl Default for SweepRange {
    fn default() -> Self {
        Self {
            start: Decimal::from(5_000),
            end: Decimal::from(100_000),
            step: Decimal::from(1_000),
        }
    }
}

impl SweepRange {
    /// Largest number of probes a single sweep may evaluate.
    pub const MAX_PROBES: usize = 10_000;

    pub fn validate(&self) -> Result<(), SweepRangeError> {
        if self.step <= Decimal::ZERO {
            return Err(SweepRangeError::NonPositiveStep(self.step));
        }
        if self.start < Decimal::ZERO {
            return Err(SweepRangeError::NegativeStart(self.start));
        }
        if self.start > self.end {
            return Err(SweepRangeError::StartAfterEnd {
                start: self.start,
                end: self.end,
            });
        }
        if self.end > ScenarioParameters::MAX_AMOUNT {
            return Err(SweepRangeError::EndTooLarge {
                end: self.end,
                max: ScenarioParameters::MAX_AMOUNT,
            });
        }
        match self.count_unchecked() {
            Some(count) if count <= Self::MAX_PROBES => Ok(()),
            _ => Err(SweepRangeError::TooManyProbes {
                step: self.step,
                max: Self::MAX_PROBES,
            }),
        }
    }

    /// Probe count for an ordered range with a positive step; `None` when
    /// it does not fit in `usize`.
    fn count_unchecked(&self) -> Option<usize> {
        (self.end - self.start)
            .checked_div(self.step)?
            .floor()
            .to_usize()?
            .checked_add(1)
    }

    /// Probe values `start, start + step, ...` up to and including `end`.
    ///
    /// An invalid range yields no probes.
    pub fn probes(&self) -> impl Iterator<Item = Decimal> + use<> {
        let first = self.validate().ok().map(|()| self.start);
        let (end, step) = (self.end, self.step);
        std::iter::successors(first, move |s| s.checked_add(step))
            .take_while(move |s| *s <= end)
    }

    pub fn probe_count(&self) -> usize {
        match self.validate() {
            Ok(()) => self.count_unchecked().unwrap_or(0),
            Err(_) => 0,
        }
    }
}

/// One point on the swept curve, keyed by the probed monthly salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepRow {
    pub monthly_salary: Decimal,
    pub base_salary: Decimal,
    pub performance_salary: Decimal,
    pub after_tax_income: Decimal,
    pub conversion_rate: Decimal,
    pub marginal_rate: Decimal,
    pub monthly_tax: Decimal,
    pub monthly_social_insurance: Decimal,
    pub monthly_without_bonus: Decimal,
    pub monthly_with_bonus: Decimal,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn range(
        start: Decimal,
        end: Decimal,
        step: Decimal,
    ) -> SweepRange {
        SweepRange { start, end, step }
    }

    #[test]
    fn default_range_spans_five_to_one_hundred_thousand() {
        let sweep = SweepRange::default();

        assert_eq!(sweep.validate(), Ok(()));
        assert_eq!(sweep.probe_count(), 96);
        assert_eq!(sweep.probes().count(), 96);
    }

    #[test]
    fn probes_include_end_when_step_lands_on_it() {
        let probes: Vec<_> = range(dec!(1000), dec!(3000), dec!(1000)).probes().collect();

        assert_eq!(probes, vec![dec!(1000), dec!(2000), dec!(3000)]);
    }

    #[test]
    fn probes_stop_before_overshooting_end() {
        let sweep = range(dec!(1000), dec!(3500), dec!(1000));

        let probes: Vec<_> = sweep.probes().collect();

        assert_eq!(probes, vec![dec!(1000), dec!(2000), dec!(3000)]);
        assert_eq!(sweep.probe_count(), 3);
    }

    #[test]
    fn single_probe_when_start_equals_end() {
        let sweep = range(dec!(8000), dec!(8000), dec!(500));

        assert_eq!(sweep.probes().collect::<Vec<_>>(), vec![dec!(8000)]);
        assert_eq!(sweep.probe_count(), 1);
    }

    #[test]
    fn validate_rejects_zero_step() {
        let sweep = range(dec!(0), dec!(100), dec!(0));

        assert_eq!(sweep.validate(), Err(SweepRangeError::NonPositiveStep(dec!(0))));
        assert_eq!(sweep.probes().count(), 0);
        assert_eq!(sweep.probe_count(), 0);
    }

    #[test]
    fn validate_rejects_negative_start() {
        let sweep = range(dec!(-100), dec!(100), dec!(10));

        assert_eq!(sweep.validate(), Err(SweepRangeError::NegativeStart(dec!(-100))));
    }

    #[test]
    fn validate_rejects_inverted_range() {
        let sweep = range(dec!(200), dec!(100), dec!(10));

        assert_eq!(
            sweep.validate(),
            Err(SweepRangeError::StartAfterEnd {
                start: dec!(200),
                end: dec!(100)
            })
        );
    }

    #[test]
    fn validate_rejects_end_above_largest_salary() {
        let sweep = range(dec!(0), Decimal::MAX, dec!(1000));

        assert_eq!(
            sweep.validate(),
            Err(SweepRangeError::EndTooLarge {
                end: Decimal::MAX,
                max: ScenarioParameters::MAX_AMOUNT
            })
        );
        assert_eq!(sweep.probe_count(), 0);
        assert_eq!(sweep.probes().count(), 0);
    }

    #[test]
    fn validate_rejects_step_producing_too_many_probes() {
        let sweep = range(dec!(5000), dec!(100000), dec!(0.00001));

        assert_eq!(
            sweep.validate(),
            Err(SweepRangeError::TooManyProbes {
                step: dec!(0.00001),
                max: SweepRange::MAX_PROBES
            })
        );
        assert_eq!(sweep.probe_count(), 0);
        assert_eq!(sweep.probes().count(), 0);
    }

    #[test]
    fn validate_rejects_step_whose_count_overflows() {
        let tiny_step = dec!(0.0000000000000000000000000001);
        let sweep = range(dec!(0), ScenarioParameters::MAX_AMOUNT, tiny_step);

        assert!(matches!(
            sweep.validate(),
            Err(SweepRangeError::TooManyProbes { .. })
        ));
        assert_eq!(sweep.probe_count(), 0);
    }

    #[test]
    fn largest_accepted_sweep_is_evaluated_in_full() {
        let sweep = range(dec!(1), dec!(10000), dec!(1));

        assert_eq!(sweep.validate(), Ok(()));
        assert_eq!(sweep.probe_count(), SweepRange::MAX_PROBES);
        assert_eq!(sweep.probes().count(), SweepRange::MAX_PROBES);
    }

    #[test]
    fn probes_end_at_largest_salary() {
        let max = ScenarioParameters::MAX_AMOUNT;
        let sweep = range(max - dec!(2), max, dec!(1));

        assert_eq!(sweep.probes().collect::<Vec<_>>(), vec![max - dec!(2), max - dec!(1), max]);
    }
}
