use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SocialInsuranceRatesError {
    #[error("{component} rate must be between 0 and 1, got {rate}")]
    InvalidRate {
        component: &'static str,
        rate: Decimal,
    },
}

/// Employee-side withholding rates for the four mandatory contributions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialInsuranceRates {
    pub pension: Decimal,
    pub medical: Decimal,
    pub unemployment: Decimal,
    pub housing_fund: Decimal,
}

impl Default for SocialInsuranceRates {
    fn default() -> Self {
        Self {
            pension: Decimal::new(8, 2),
            medical: Decimal::new(2, 2),
            unemployment: Decimal::new(2, 3),
            housing_fund: Decimal::new(5, 2),
        }
    }
}

impl SocialInsuranceRates {
    /// Checks that every rate lies in `[0, 1]`.
    pub fn validate(&self) -> Result<(), SocialInsuranceRatesError> {
        let components = [
            ("pension", self.pension),
            ("medical", self.medical),
            ("unemployment", self.unemployment),
            ("housing fund", self.housing_fund),
        ];
        for (component, rate) in components {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(SocialInsuranceRatesError::InvalidRate { component, rate });
            }
        }
        Ok(())
    }
}

/// Monthly amount withheld for each contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialInsuranceBreakdown {
    pub pension: Decimal,
    pub medical: Decimal,
    pub unemployment: Decimal,
    pub housing_fund: Decimal,
}

impl SocialInsuranceBreakdown {
    pub fn total(&self) -> Decimal {
        self.pension + self.medical + self.unemployment + self.housing_fund
    }

    /// The same breakdown scaled to a full year.
    pub fn annual(&self) -> Self {
        let months = Decimal::from(12);
        Self {
            pension: self.pension * months,
            medical: self.medical * months,
            unemployment: self.unemployment * months,
            housing_fund: self.housing_fund * months,
        }
    }

    /// Labelled components in display order.
    pub fn items(&self) -> [(&'static str, Decimal); 4] {
        [
            ("Pension", self.pension),
            ("Medical", self.medical),
            ("Unemployment", self.unemployment),
            ("Housing fund", self.housing_fund),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialInsuranceContribution {
    pub breakdown: SocialInsuranceBreakdown,
    pub monthly_total: Decimal,
    pub annual_total: Decimal,
}
