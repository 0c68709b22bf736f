use iit_core::ScenarioParameters;
use iit_core::calculations::common::round_half_up;
use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a command-line amount cannot be accepted.
#[derive(Debug, Error)]
pub enum ParseDecimalError {
    #[error("invalid decimal '{input}': {source}")]
    Invalid {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("amount must not be negative, got '{0}'")]
    Negative(String),

    #[error("'{input}' exceeds the largest accepted value {max}")]
    TooLarge { input: String, max: Decimal },
}

/// Normalizes input for decimal parsing: trims whitespace and removes commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a string into a [`Decimal`].
///
/// Handles comma as thousands separator (e.g. `"15,000"`).
/// Empty or whitespace-only input is treated as 0.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::warn!(input = %s, "invalid decimal: {}", e);
        ParseDecimalError::Invalid {
            input: s.to_string(),
            source: e,
        }
    })
}

fn parse_bounded(
    s: &str,
    max: Decimal,
) -> Result<Decimal, ParseDecimalError> {
    let value = parse_decimal(s)?;
    if value < Decimal::ZERO {
        return Err(ParseDecimalError::Negative(s.trim().to_string()));
    }
    if value > max {
        return Err(ParseDecimalError::TooLarge {
            input: s.trim().to_string(),
            max,
        });
    }
    Ok(value)
}

/// Like [`parse_decimal`] but only accepts `0..=ScenarioParameters::MAX_AMOUNT`.
/// Used for salary, cap, deduction and sweep flags.
pub fn parse_amount(s: &str) -> Result<Decimal, ParseDecimalError> {
    parse_bounded(s, ScenarioParameters::MAX_AMOUNT)
}

pub fn parse_bonus_months(s: &str) -> Result<Decimal, ParseDecimalError> {
    parse_bounded(s, ScenarioParameters::MAX_BONUS_MONTHS)
}

pub fn parse_multiplier(s: &str) -> Result<Decimal, ParseDecimalError> {
    parse_bounded(s, ScenarioParameters::MAX_MULTIPLIER)
}

/// Formats a money amount rounded half-up to 2 decimals with thousands
/// separators, e.g. `277,299.72`.
pub fn format_amount(value: Decimal) -> String {
    let rounded = round_half_up(value);
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}

/// Formats a fraction as a percentage with 2 decimals, e.g. `0.9169` as
/// `91.69%`.
pub fn format_rate(rate: Decimal) -> String {
    format!("{:.2}%", round_half_up(rate * Decimal::ONE_HUNDRED))
}
