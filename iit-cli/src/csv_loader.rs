//! CSV loader for batch scenario input.
//!
//! ## CSV Format
//!
//! Column order does **not** matter (headers are matched by name). Header
//! names are case-sensitive. Amounts are monthly.
//!
//! | Column                         | Required | Type    | Notes                         |
//! |--------------------------------|----------|---------|-------------------------------|
//! | `label`                        | no       | string  | Shown in reports and history  |
//! | `base_salary`                  | yes      | decimal |                               |
//! | `performance_salary`           | yes      | decimal |                               |
//! | `bonus_base_months`            | yes      | decimal | e.g. `1.0`                    |
//! | `performance_multiplier`       | yes      | decimal | e.g. `1.5`                    |
//! | `social_insurance_base`        | yes      | decimal | City cap                      |
//! | `housing_fund_base`            | yes      | decimal | City cap                      |
//! | `additional_deductions`        | yes      | decimal | Special deductions per month  |
//! | `include_performance_in_bonus` | no       | bool    | `true`/`false`, default true  |
//!
//! ### Example
//!
//! ```csv
//! label,base_salary,performance_salary,bonus_base_months,performance_multiplier,social_insurance_base,housing_fund_base,additional_deductions
//! current,15000,8000,1.0,1.5,4775,2520,0
//! offer,20000,5000,2.0,1.0,6326,2770,1000
//! ```
use iit_core::ScenarioParameters;
use rust_decimal::Decimal;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    label: Option<String>,
    base_salary: Decimal,
    performance_salary: Decimal,
    bonus_base_months: Decimal,
    performance_multiplier: Decimal,
    social_insurance_base: Decimal,
    housing_fund_base: Decimal,
    additional_deductions: Decimal,
    #[serde(default)]
    include_performance_in_bonus: Option<bool>,
}

/// A scenario read from a batch file, with its optional label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledScenario {
    pub label: Option<String>,
    pub parameters: ScenarioParameters,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading or converting CSV data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// The underlying CSV deserialisation failed (bad structure, missing
    /// required column, type mismatch, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A monetary or multiplier column held a negative value. `row` is
    /// 1-based (header = row 0).
    #[error("negative {field} on row {row}")]
    NegativeAmount { field: &'static str, row: usize },

    /// A column held a value above its accepted upper bound.
    #[error("{field} on row {row} is too large")]
    OutOfRange { field: &'static str, row: usize },

    #[error("cannot read '{path}': {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

/// Convert a single CSV row into a LabeledScenario.
///
/// row_number is 1-based (for error messages).
fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<LabeledScenario, CsvLoadError> {
    let parameters = ScenarioParameters {
        base_salary: row.base_salary,
        performance_salary: row.performance_salary,
        bonus_base_months: row.bonus_base_months,
        performance_multiplier: row.performance_multiplier,
        social_insurance_base: row.social_insurance_base,
        housing_fund_base: row.housing_fund_base,
        additional_deductions: row.additional_deductions,
        include_performance_in_bonus: row.include_performance_in_bonus.unwrap_or(true),
    };

    if let Some(&field) = parameters.negative_fields().first() {
        return Err(CsvLoadError::NegativeAmount {
            field,
            row: row_number,
        });
    }
    if let Some(&field) = parameters.out_of_range_fields().first() {
        return Err(CsvLoadError::OutOfRange {
            field,
            row: row_number,
        });
    }

    Ok(LabeledScenario {
        label: row.label.filter(|l| !l.is_empty()),
        parameters,
    })
}

/// Parse CSV text (the full file contents as a &str) and return the
/// scenarios in file order.
///
/// # Errors
///
/// * [CsvLoadError::Parse]: if the CSV is structurally invalid or a
///   required field cannot be deserialised.
/// * [CsvLoadError::NegativeAmount]: if any row holds a negative amount.
/// * [CsvLoadError::OutOfRange]: if any row holds a value above its bound.
pub fn load_from_str(input: &str) -> Result<Vec<LabeledScenario>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All) // tolerate whitespace around values
        .flexible(false) // strict column count
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            let row_number = idx + 1; // 1-based for user-facing messages
            convert_row(row, row_number)
        })
        .collect()
}

/// Convenience wrapper: read a file from disk and delegate to [load_from_str].
pub fn load_from_file(path: &std::path::Path) -> Result<Vec<LabeledScenario>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let scenarios = load_from_str(&contents)?;
    tracing::debug!(path = %path.display(), rows = scenarios.len(), "loaded batch file");
    Ok(scenarios)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
