//! Shared arithmetic helpers for the salary and bonus calculations.

use rust_decimal::Decimal;

/// Number of salary payments in a year.
pub const MONTHS_PER_YEAR: i64 = 12;

/// Rounds a monetary amount to fen (two decimal places), midpoint away from
/// zero.
///
/// Calculations keep full precision; this is applied when presenting values.
///
/// ```
/// use rust_decimal_macros::dec;
/// use iit_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(382.004)), dec!(382.00));
/// assert_eq!(round_half_up(dec!(9.555)), dec!(9.56));
/// assert_eq!(round_half_up(dec!(-9.555)), dec!(-9.56));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two amounts.
///
/// ```
/// use rust_decimal_macros::dec;
/// use iit_core::calculations::common::max;
///
/// assert_eq!(max(dec!(-120.00), dec!(0)), dec!(0));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Scales a monthly amount to a year.
pub fn annualize(monthly: Decimal) -> Decimal {
    monthly * Decimal::from(MONTHS_PER_YEAR)
}

/// Spreads an annual amount evenly over twelve months.
pub fn per_month(annual: Decimal) -> Decimal {
    annual / Decimal::from(MONTHS_PER_YEAR)
}
