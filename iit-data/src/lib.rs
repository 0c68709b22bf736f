//! Loaders for the tables that parameterize a calculation: progressive
//! bracket schedules and per-city contribution caps.

pub mod bracket_loader;
pub mod city_presets;

pub use bracket_loader::{BracketLoader, BracketLoaderError, BracketRecord, BracketTableKind};
pub use city_presets::{CityPreset, CityPresetError, CityPresetLoader, CityPresets};
