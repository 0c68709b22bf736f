//! Employee social insurance and housing fund withholdings.
//!
//! | Component    | Rate | Capped by                |
//! |--------------|------|--------------------------|
//! | Pension      | 8%   | social insurance base    |
//! | Medical      | 2%   | social insurance base    |
//! | Unemployment | 0.2% | social insurance base    |
//! | Housing fund | 5%   | housing fund base        |
//!
//! Each component is `min(cap, monthly_pay) × rate`, so pay above a cap does
//! not increase that contribution.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use iit_core::SocialInsuranceRates;
//! use iit_core::calculations::SocialInsuranceCalculator;
//!
//! let calculator = SocialInsuranceCalculator::new(SocialInsuranceRates::default());
//! let result = calculator.calculate(dec!(23000), dec!(4775), dec!(2520));
//!
//! assert_eq!(result.breakdown.pension, dec!(382.00));
//! assert_eq!(result.monthly_total, dec!(613.05));
//! assert_eq!(result.annual_total, dec!(7356.60));
//! ```

use rust_decimal::Decimal;

use crate::calculations::common::{annualize, max};
use crate::{SocialInsuranceBreakdown, SocialInsuranceContribution, SocialInsuranceRates};

#[derive(Debug, Clone)]
pub struct SocialInsuranceCalculator {
    rates: SocialInsuranceRates,
}

impl SocialInsuranceCalculator {
    pub fn new(rates: SocialInsuranceRates) -> Self {
        Self { rates }
    }

    /// Computes the monthly breakdown and its monthly and annual totals.
    ///
    /// Negative pay or caps are floored at zero; a zero cap yields a zero
    /// contribution for the components it governs.
    pub fn calculate(
        &self,
        monthly_pay: Decimal,
        social_insurance_base: Decimal,
        housing_fund_base: Decimal,
    ) -> SocialInsuranceContribution {
        let insured_pay = Self::contribution_base(social_insurance_base, monthly_pay);
        let fund_pay = Self::contribution_base(housing_fund_base, monthly_pay);

        let breakdown = SocialInsuranceBreakdown {
            pension: insured_pay * self.rates.pension,
            medical: insured_pay * self.rates.medical,
            unemployment: insured_pay * self.rates.unemployment,
            housing_fund: fund_pay * self.rates.housing_fund,
        };
        let monthly_total = breakdown.total();

        SocialInsuranceContribution {
            breakdown,
            monthly_total,
            annual_total: annualize(monthly_total),
        }
    }

    /// The pay figure a contribution is levied on: pay, saturated at the cap.
    fn contribution_base(
        cap: Decimal,
        monthly_pay: Decimal,
    ) -> Decimal {
        max(cap.min(monthly_pay), Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::{prop_assert_eq, proptest};
    use rust_decimal_macros::dec;

    use super::*;

    fn calculator() -> SocialInsuranceCalculator {
        SocialInsuranceCalculator::new(SocialInsuranceRates::default())
    }

    // =========================================================================
    // contribution_base tests
    // =========================================================================

    #[test]
    fn contribution_base_uses_pay_below_cap() {
        assert_eq!(
            SocialInsuranceCalculator::contribution_base(dec!(4775), dec!(3000)),
            dec!(3000)
        );
    }

    #[test]
    fn contribution_base_saturates_at_cap() {
        assert_eq!(
            SocialInsuranceCalculator::contribution_base(dec!(4775), dec!(23000)),
            dec!(4775)
        );
    }

    #[test]
    fn contribution_base_floors_negative_values() {
        assert_eq!(
            SocialInsuranceCalculator::contribution_base(dec!(-10), dec!(5000)),
            dec!(0)
        );
    }

    // =========================================================================
    // calculate tests
    // =========================================================================

    #[test]
    fn calculate_pay_equal_to_cap_is_not_saturated() {
        let result = calculator().calculate(dec!(4775), dec!(4775), dec!(2520));

        assert_eq!(result.breakdown.pension, dec!(382.0));
        assert_eq!(result.breakdown.medical, dec!(95.50));
        assert_eq!(result.breakdown.unemployment, dec!(9.55));
        assert_eq!(result.breakdown.housing_fund, dec!(126.00));
    }

    #[test]
    fn calculate_below_both_caps_uses_pay() {
        let result = calculator().calculate(dec!(2000), dec!(4775), dec!(2520));

        assert_eq!(result.breakdown.pension, dec!(160));
        assert_eq!(result.breakdown.medical, dec!(40));
        assert_eq!(result.breakdown.unemployment, dec!(4));
        assert_eq!(result.breakdown.housing_fund, dec!(100));
        assert_eq!(result.monthly_total, dec!(304));
        assert_eq!(result.annual_total, dec!(3648));
    }

    #[test]
    fn calculate_caps_apply_independently() {
        // Above the housing fund cap but below the social insurance cap.
        let result = calculator().calculate(dec!(3000), dec!(4775), dec!(2520));

        assert_eq!(result.breakdown.pension, dec!(240));
        assert_eq!(result.breakdown.housing_fund, dec!(126));
    }

    #[test]
    fn calculate_zero_cap_yields_zero_component() {
        let result = calculator().calculate(dec!(10000), dec!(0), dec!(2520));

        assert_eq!(result.breakdown.pension, dec!(0));
        assert_eq!(result.breakdown.medical, dec!(0));
        assert_eq!(result.breakdown.unemployment, dec!(0));
        assert_eq!(result.breakdown.housing_fund, dec!(126));
        assert_eq!(result.monthly_total, dec!(126));
    }

    #[test]
    fn calculate_zero_pay_yields_zero_total() {
        let result = calculator().calculate(dec!(0), dec!(4775), dec!(2520));

        assert_eq!(result.monthly_total, dec!(0));
        assert_eq!(result.annual_total, dec!(0));
    }

    #[test]
    fn calculate_honours_custom_rates() {
        let rates = SocialInsuranceRates {
            housing_fund: dec!(0.12),
            ..SocialInsuranceRates::default()
        };
        let result = SocialInsuranceCalculator::new(rates).calculate(
            dec!(30000),
            dec!(30000),
            dec!(30000),
        );

        assert_eq!(result.breakdown.housing_fund, dec!(3600));
    }

    // =========================================================================
    // properties
    // =========================================================================

    proptest! {
        #[test]
        fn prop_contributions_saturate_at_caps(
            pay in 0u32..200_000,
            ss_cap in 0u32..50_000,
            hf_cap in 0u32..50_000
        ) {
            let (pay, ss_cap, hf_cap) = (Decimal::from(pay), Decimal::from(ss_cap), Decimal::from(hf_cap));
            let rates = SocialInsuranceRates::default();
            let result = calculator().calculate(pay, ss_cap, hf_cap);

            let insured = if pay <= ss_cap { pay } else { ss_cap };
            let funded = if pay <= hf_cap { pay } else { hf_cap };

            prop_assert_eq!(result.breakdown.pension, insured * rates.pension);
            prop_assert_eq!(result.breakdown.medical, insured * rates.medical);
            prop_assert_eq!(result.breakdown.unemployment, insured * rates.unemployment);
            prop_assert_eq!(result.breakdown.housing_fund, funded * rates.housing_fund);
            prop_assert_eq!(result.annual_total, result.monthly_total * Decimal::from(12));
        }
    }
}
