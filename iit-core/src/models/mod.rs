mod scenario_parameters;
mod scenario_result;
mod social_insurance;
mod sweep;
mod tax_bracket;
mod tax_policy;

pub use scenario_parameters::ScenarioParameters;
pub use scenario_result::{BonusDetail, IncomeComposition, MonthlyStructure, ScenarioResult};
pub use social_insurance::{
    SocialInsuranceBreakdown, SocialInsuranceContribution, SocialInsuranceRates,
    SocialInsuranceRatesError,
};
pub use sweep::{SweepRange, SweepRangeError, SweepRow};
pub use tax_bracket::{BracketTable, BracketTableError, TaxBracket};
pub use tax_policy::TaxPolicy;
