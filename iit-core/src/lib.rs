pub mod calculations;
pub mod models;

pub use calculations::{ScenarioComparison, ScenarioEvaluator, SweepGenerator};
pub use models::*;
