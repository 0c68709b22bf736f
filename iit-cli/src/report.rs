//! Plain-text reports printed to stdout.
//!
//! Each report is a [`Display`](fmt::Display) wrapper; amounts are rounded
//! half-up to two decimals on the way out.

use std::fmt;

use iit_core::{ScenarioComparison, ScenarioResult, SweepRow};
use iit_data::CityPresets;
use rust_decimal::Decimal;

use crate::history::ScenarioHistory;
use crate::utils::{format_amount, format_rate};

const LABEL_WIDTH: usize = 26;
const VALUE_WIDTH: usize = 16;

fn heading(
    f: &mut fmt::Formatter<'_>,
    title: &str,
) -> fmt::Result {
    writeln!(f, "{title}")
}

fn amount_line(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    value: Decimal,
) -> fmt::Result {
    writeln!(
        f,
        "  {label:<LABEL_WIDTH$}{:>VALUE_WIDTH$}",
        format_amount(value)
    )
}

fn rate_line(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    value: Decimal,
) -> fmt::Result {
    writeln!(
        f,
        "  {label:<LABEL_WIDTH$}{:>VALUE_WIDTH$}",
        format_rate(value)
    )
}

// ---------------------------------------------------------------------------
// Single evaluation
// ---------------------------------------------------------------------------

pub struct ResultReport<'a> {
    label: Option<&'a str>,
    result: &'a ScenarioResult,
}

impl<'a> ResultReport<'a> {
    pub fn new(
        label: Option<&'a str>,
        result: &'a ScenarioResult,
    ) -> Self {
        Self { label, result }
    }
}

impl fmt::Display for ResultReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let r = self.result;
        if let Some(label) = self.label {
            writeln!(f, "== {label} ==")?;
        }

        heading(f, "Income")?;
        amount_line(f, "Base salary", r.base_salary)?;
        amount_line(f, "Performance salary", r.performance_salary)?;
        amount_line(f, "Monthly salary", r.monthly_salary)?;
        amount_line(f, "Annual salary", r.annual_salary)?;

        let bonus = r.bonus_detail();
        heading(f, "Bonus")?;
        writeln!(
            f,
            "  {:<LABEL_WIDTH$}{:>VALUE_WIDTH$}",
            "Months x multiplier",
            format!(
                "{} x {}",
                bonus.bonus_base_months.normalize(),
                bonus.performance_multiplier.normalize()
            )
        )?;
        amount_line(f, "Bonus base", bonus.bonus_base)?;
        amount_line(f, "Bonus", bonus.bonus)?;
        amount_line(f, "Bonus tax", bonus.bonus_tax)?;
        amount_line(f, "Bonus after tax", bonus.bonus_after_tax)?;

        heading(f, "Social insurance (monthly)")?;
        for (label, value) in r.social_insurance.breakdown.items() {
            amount_line(f, label, value)?;
        }
        amount_line(f, "Total", r.social_insurance.monthly_total)?;

        heading(f, "Tax (annual)")?;
        amount_line(f, "Taxable income", r.taxable_income)?;
        amount_line(f, "Salary tax", r.salary_tax)?;
        amount_line(f, "Bonus tax", r.bonus_tax)?;
        amount_line(f, "Total tax", r.total_tax)?;
        rate_line(f, "Marginal rate", r.marginal_rate)?;

        let composition = r.income_composition();
        heading(f, "Annual summary")?;
        amount_line(f, "Pre-tax income", r.total_income)?;
        amount_line(f, "Social insurance", composition.social_insurance)?;
        amount_line(f, "Income tax", composition.income_tax)?;
        amount_line(f, "After-tax income", composition.after_tax_income)?;
        rate_line(f, "Conversion rate", r.conversion_rate)?;

        let monthly = r.monthly_structure();
        heading(f, "Monthly take-home")?;
        amount_line(f, "Average income tax", monthly.income_tax)?;
        amount_line(f, "Without bonus", monthly.take_home)?;
        amount_line(f, "With bonus", r.monthly_with_bonus)
    }
}

// ---------------------------------------------------------------------------
// Sweep table
// ---------------------------------------------------------------------------

pub struct SweepReport<'a> {
    rows: &'a [SweepRow],
    monthly_thresholds: &'a [Decimal],
}

impl<'a> SweepReport<'a> {
    /// `monthly_thresholds` are the salary-table bracket edges divided by
    /// twelve, listed under the table.
    pub fn new(
        rows: &'a [SweepRow],
        monthly_thresholds: &'a [Decimal],
    ) -> Self {
        Self {
            rows,
            monthly_thresholds,
        }
    }
}

impl fmt::Display for SweepReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(
            f,
            "{:>14} {:>14} {:>14} {:>16} {:>10} {:>8} {:>12} {:>12} {:>14}",
            "Monthly",
            "Base",
            "Performance",
            "After-tax/yr",
            "Convert",
            "Marg.",
            "Tax/mo",
            "SI/mo",
            "Take-home/mo"
        )?;
        for row in self.rows {
            writeln!(
                f,
                "{:>14} {:>14} {:>14} {:>16} {:>10} {:>8} {:>12} {:>12} {:>14}",
                format_amount(row.monthly_salary),
                format_amount(row.base_salary),
                format_amount(row.performance_salary),
                format_amount(row.after_tax_income),
                format_rate(row.conversion_rate),
                format_rate(row.marginal_rate),
                format_amount(row.monthly_tax),
                format_amount(row.monthly_social_insurance),
                format_amount(row.monthly_without_bonus),
            )?;
        }

        if !self.monthly_thresholds.is_empty() {
            let edges: Vec<String> = self
                .monthly_thresholds
                .iter()
                .map(|t| format_amount(*t))
                .collect();
            writeln!(f, "Bracket edges (taxable income per month): {}", edges.join(", "))?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

pub struct ComparisonReport<'a> {
    comparison: &'a ScenarioComparison,
}

impl<'a> ComparisonReport<'a> {
    pub fn new(comparison: &'a ScenarioComparison) -> Self {
        Self { comparison }
    }
}

impl fmt::Display for ComparisonReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let (p, c, d) = (
            &self.comparison.previous,
            &self.comparison.current,
            &self.comparison.delta,
        );

        writeln!(
            f,
            "  {:<LABEL_WIDTH$}{:>VALUE_WIDTH$}{:>VALUE_WIDTH$}{:>VALUE_WIDTH$}",
            "", "Previous", "Current", "Change"
        )?;

        let amounts = [
            ("Monthly salary", p.monthly_salary, c.monthly_salary, d.monthly_salary),
            ("Base salary", p.base_salary, c.base_salary, d.base_salary),
            (
                "Performance salary",
                p.performance_salary,
                c.performance_salary,
                d.performance_salary,
            ),
            ("Bonus", p.bonus, c.bonus, d.bonus),
            ("Pre-tax income", p.total_income, c.total_income, d.total_income),
            (
                "After-tax income",
                p.after_tax_income,
                c.after_tax_income,
                d.after_tax_income,
            ),
            (
                "Monthly with bonus",
                p.monthly_with_bonus,
                c.monthly_with_bonus,
                d.monthly_with_bonus,
            ),
        ];
        for (label, previous, current, change) in amounts {
            writeln!(
                f,
                "  {label:<LABEL_WIDTH$}{:>VALUE_WIDTH$}{:>VALUE_WIDTH$}{:>VALUE_WIDTH$}",
                format_amount(previous),
                format_amount(current),
                format_amount(change)
            )?;
        }

        let rates = [
            ("Conversion rate", p.conversion_rate, c.conversion_rate, d.conversion_rate),
            ("Marginal rate", p.marginal_rate, c.marginal_rate, d.marginal_rate),
        ];
        for (label, previous, current, change) in rates {
            writeln!(
                f,
                "  {label:<LABEL_WIDTH$}{:>VALUE_WIDTH$}{:>VALUE_WIDTH$}{:>VALUE_WIDTH$}",
                format_rate(previous),
                format_rate(current),
                format_rate(change)
            )?;
        }

        let verdict = if self.comparison.is_improvement() {
            "Current scenario takes home more per year."
        } else {
            "Current scenario does not take home more per year."
        };
        writeln!(f, "{verdict}")
    }
}

// ---------------------------------------------------------------------------
// City presets
// ---------------------------------------------------------------------------

pub struct PresetsReport<'a> {
    presets: &'a CityPresets,
}

impl<'a> PresetsReport<'a> {
    pub fn new(presets: &'a CityPresets) -> Self {
        Self { presets }
    }
}

impl fmt::Display for PresetsReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(
            f,
            "{:<12} {:<8} {:>14} {:>14}",
            "City", "Alias", "SI base", "HF base"
        )?;
        for preset in self.presets.iter() {
            writeln!(
                f,
                "{:<12} {:<8} {:>14} {:>14}",
                preset.name,
                preset.alias.as_deref().unwrap_or("-"),
                format_amount(preset.social_insurance_base),
                format_amount(preset.housing_fund_base)
            )?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Session history
// ---------------------------------------------------------------------------

pub struct HistoryReport<'a> {
    history: &'a ScenarioHistory,
}

impl<'a> HistoryReport<'a> {
    pub fn new(history: &'a ScenarioHistory) -> Self {
        Self { history }
    }
}

impl fmt::Display for HistoryReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(
            f,
            "History ({} of {} kept)",
            self.history.len(),
            self.history.capacity()
        )?;
        writeln!(
            f,
            "{:>4} {:<9} {:<16} {:>14} {:>16} {:>10}",
            "#", "Time", "Label", "Monthly", "After-tax/yr", "Convert"
        )?;
        for entry in self.history.entries() {
            writeln!(
                f,
                "{:>4} {:<9} {:<16} {:>14} {:>16} {:>10}",
                entry.id,
                entry.recorded_at.format("%H:%M:%S").to_string(),
                entry.label.as_deref().unwrap_or("-"),
                format_amount(entry.result.monthly_salary),
                format_amount(entry.result.after_tax_income),
                format_rate(entry.result.conversion_rate),
            )?;
        }
        Ok(())
    }
}
