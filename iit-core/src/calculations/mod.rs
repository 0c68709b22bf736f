//! Individual income tax and take-home pay calculations.
//!
//! Leaves first: the progressive tax schedules and the social insurance
//! calculator feed the scenario evaluator, which the sweep generator and the
//! comparison build on.

pub mod common;
pub mod comparison;
pub mod progressive_tax;
pub mod scenario;
pub mod social_insurance;
pub mod sweep;

pub use comparison::{ScenarioComparison, ScenarioDelta};
pub use scenario::ScenarioEvaluator;
pub use social_insurance::SocialInsuranceCalculator;
pub use sweep::SweepGenerator;
