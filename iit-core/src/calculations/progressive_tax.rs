//! Progressive income tax on comprehensive income and on the annual bonus.
//!
//! Both variants use the quick-deduction form of the progressive schedule:
//! `tax = amount × rate − quick_deduction`, where the bracket is chosen from a
//! [`BracketTable`]. The deduction constants make the salary schedule
//! continuous at every bracket edge.
//!
//! | Annual taxable income | Rate | Quick deduction |
//! |-----------------------|------|-----------------|
//! | ≤ 36,000              | 3%   | 0               |
//! | ≤ 144,000             | 10%  | 2,520           |
//! | ≤ 300,000             | 20%  | 16,920          |
//! | ≤ 420,000             | 25%  | 31,920          |
//! | ≤ 660,000             | 30%  | 52,920          |
//! | ≤ 960,000             | 35%  | 85,920          |
//! | above                 | 45%  | 181,920         |
//!
//! The annual one-time bonus is taxed separately: its bracket is chosen by
//! the bonus divided by twelve, but the rate and the (monthly) quick
//! deduction are applied once to the whole bonus. This makes the bonus tax
//! jump upward at each edge.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use iit_core::BracketTable;
//! use iit_core::calculations::progressive_tax::{annual_bonus_tax, marginal_rate, salary_tax};
//!
//! let salary = BracketTable::comprehensive_2019();
//! let bonus = BracketTable::annual_bonus_2019();
//!
//! assert_eq!(salary_tax(&salary, dec!(100000)), dec!(7480));
//! assert_eq!(marginal_rate(&salary, dec!(100000)), dec!(0.10));
//! assert_eq!(annual_bonus_tax(&bonus, dec!(36000)), dec!(1080));
//! assert_eq!(annual_bonus_tax(&bonus, dec!(36001)), dec!(3390.1));
//! ```

use rust_decimal::Decimal;

use crate::BracketTable;
use crate::calculations::common::{max, per_month};

/// Tax on annual comprehensive taxable income.
///
/// Negative input is treated as zero so a caller that forgot to clamp can
/// never land in the wrong bracket or receive a negative tax.
pub fn salary_tax(
    table: &BracketTable,
    taxable_income: Decimal,
) -> Decimal {
    let income = max(taxable_income, Decimal::ZERO);
    let bracket = table.find(income);
    max(income * bracket.rate - bracket.quick_deduction, Decimal::ZERO)
}

/// Tax on an annual one-time bonus taxed separately from salary.
///
/// A zero or negative bonus returns exactly zero without touching the
/// schedule, since a positive quick deduction on a zero base would otherwise
/// go negative.
pub fn annual_bonus_tax(
    table: &BracketTable,
    bonus: Decimal,
) -> Decimal {
    if bonus <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let bracket = table.find(per_month(bonus));
    max(bonus * bracket.rate - bracket.quick_deduction, Decimal::ZERO)
}

/// Rate applied to the next unit of taxable income.
///
/// Bracket edges belong to the lower bracket, so income at or below the first
/// edge (including zero) reports the lowest rate.
pub fn marginal_rate(
    table: &BracketTable,
    taxable_income: Decimal,
) -> Decimal {
    table.find(max(taxable_income, Decimal::ZERO)).rate
}
