use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One row of a progressive rate table.
///
/// `upper_bound` is inclusive; `None` marks the unbounded top bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
    pub quick_deduction: Decimal,
}

impl TaxBracket {
    fn new(
        upper_bound: Option<i64>,
        rate_percent: i64,
        quick_deduction: i64,
    ) -> Self {
        Self {
            upper_bound: upper_bound.map(Decimal::from),
            rate: Decimal::new(rate_percent, 2),
            quick_deduction: Decimal::from(quick_deduction),
        }
    }

    /// Whether `amount` lies at or below this bracket's upper bound.
    pub fn contains(
        &self,
        amount: Decimal,
    ) -> bool {
        self.upper_bound.is_none_or(|upper| amount <= upper)
    }
}

/// Errors raised when a bracket table violates its ordering invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    #[error("bracket table is empty")]
    Empty,

    #[error("bracket {index} upper bound {bound} does not exceed the previous bound")]
    NonIncreasingBound { index: usize, bound: Decimal },

    #[error("bracket {index} is unbounded but is not the last bracket")]
    UnboundedBeforeEnd { index: usize },

    #[error("last bracket must be unbounded")]
    MissingUnboundedBracket,

    #[error("bracket {index} rate must be between 0 and 1, got {rate}")]
    InvalidRate { index: usize, rate: Decimal },

    #[error("bracket {index} quick deduction must be non-negative, got {deduction}")]
    NegativeDeduction { index: usize, deduction: Decimal },
}

/// An ordered, validated progressive rate table.
///
/// Upper bounds are strictly increasing and the table always ends in exactly
/// one unbounded bracket, so every non-negative amount maps to one bracket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketTable {
    brackets: Vec<TaxBracket>,
}

impl BracketTable {
    /// Builds a table after checking ordering, rates and deductions.
    ///
    /// # Errors
    ///
    /// Returns [`BracketTableError`] describing the first violated invariant.
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, BracketTableError> {
        if brackets.is_empty() {
            return Err(BracketTableError::Empty);
        }

        let last = brackets.len() - 1;
        let mut previous: Option<Decimal> = None;
        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(BracketTableError::InvalidRate {
                    index,
                    rate: bracket.rate,
                });
            }
            if bracket.quick_deduction < Decimal::ZERO {
                return Err(BracketTableError::NegativeDeduction {
                    index,
                    deduction: bracket.quick_deduction,
                });
            }
            match bracket.upper_bound {
                None if index != last => {
                    return Err(BracketTableError::UnboundedBeforeEnd { index });
                }
                None => {}
                Some(bound) => {
                    if index == last {
                        return Err(BracketTableError::MissingUnboundedBracket);
                    }
                    if previous.is_some_and(|p| bound <= p) {
                        return Err(BracketTableError::NonIncreasingBound { index, bound });
                    }
                    previous = Some(bound);
                }
            }
        }

        Ok(Self { brackets })
    }

    /// Comprehensive (salary) income table in force since 2019, keyed by
    /// annual taxable income.
    pub fn comprehensive_2019() -> Self {
        Self {
            brackets: vec![
                TaxBracket::new(Some(36_000), 3, 0),
                TaxBracket::new(Some(144_000), 10, 2_520),
                TaxBracket::new(Some(300_000), 20, 16_920),
                TaxBracket::new(Some(420_000), 25, 31_920),
                TaxBracket::new(Some(660_000), 30, 52_920),
                TaxBracket::new(Some(960_000), 35, 85_920),
                TaxBracket::new(None, 45, 181_920),
            ],
        }
    }

    /// Annual one-time bonus table, keyed by the average monthly bonus.
    pub fn annual_bonus_2019() -> Self {
        Self {
            brackets: vec![
                TaxBracket::new(Some(3_000), 3, 0),
                TaxBracket::new(Some(12_000), 10, 210),
                TaxBracket::new(Some(25_000), 20, 1_410),
                TaxBracket::new(Some(35_000), 25, 2_660),
                TaxBracket::new(Some(55_000), 30, 4_410),
                TaxBracket::new(Some(80_000), 35, 7_160),
                TaxBracket::new(None, 45, 15_160),
            ],
        }
    }

    /// Returns the bracket that applies to `amount`.
    ///
    /// Negative amounts select the first bracket. Bounds are sorted, so the
    /// lookup is a binary search over the bounded prefix.
    pub fn find(
        &self,
        amount: Decimal,
    ) -> &TaxBracket {
        let index = self
            .brackets
            .partition_point(|b| b.upper_bound.is_some_and(|upper| upper < amount));
        &self.brackets[index.min(self.brackets.len() - 1)]
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Finite upper bounds in ascending order.
    pub fn upper_bounds(&self) -> Vec<Decimal> {
        self.brackets.iter().filter_map(|b| b.upper_bound).collect()
    }

    /// Upper bounds divided by twelve, for marking bracket transitions on a
    /// monthly-salary axis.
    pub fn monthly_thresholds(&self) -> Vec<Decimal> {
        let months = Decimal::from(12);
        self.brackets
            .iter()
            .filter_map(|b| b.upper_bound)
            .map(|upper| upper / months)
            .collect()
    }
}
