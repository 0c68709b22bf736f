use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{debug, info};

use iit_cli::{
    app::{PreviousOverrides, ScenarioOverrides, Session},
    config::AppConfig,
    csv_loader,
    export::{self, ScenarioExport},
    logging,
    report::{ComparisonReport, HistoryReport, PresetsReport, ResultReport, SweepReport},
    utils::{parse_amount, parse_bonus_months, parse_multiplier},
};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Individual income tax and take-home pay calculator for salary + annual
/// bonus packages.
#[derive(Debug, Parser)]
#[command(name = "iit", version)]
struct Cli {
    /// TOML configuration file with default scenario, sweep and logging settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `iit_core=trace,info`. RUST_LOG wins when set.
    #[arg(long, global = true, value_parser = logging::parse_log_filter)]
    log_level: Option<String>,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate one scenario and print the full breakdown.
    Evaluate {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Label shown in the report.
        #[arg(long)]
        label: Option<String>,

        /// Write the parameters and result as JSON.
        #[arg(long)]
        json_out: Option<PathBuf>,
    },

    /// Re-evaluate the scenario across a range of monthly salaries.
    Sweep {
        #[command(flatten)]
        scenario: ScenarioArgs,

        #[arg(long, value_parser = parse_amount)]
        start: Option<Decimal>,

        #[arg(long, value_parser = parse_amount)]
        end: Option<Decimal>,

        #[arg(long, value_parser = parse_amount)]
        step: Option<Decimal>,

        /// Write the sweep table as CSV.
        #[arg(long)]
        csv_out: Option<PathBuf>,
    },

    /// Compare a previous job against the current scenario.
    Compare {
        #[command(flatten)]
        scenario: ScenarioArgs,

        #[command(flatten)]
        previous: PreviousArgs,
    },

    /// Evaluate every row of a CSV file and print the session history.
    Batch {
        /// CSV file with one scenario per row.
        file: PathBuf,
    },

    /// List the available city presets.
    Presets,
}

#[derive(Debug, Args)]
struct ScenarioArgs {
    /// City preset supplying the contribution caps (English or local name).
    #[arg(long)]
    city: Option<String>,

    /// Monthly base salary.
    #[arg(long = "base", value_parser = parse_amount)]
    base_salary: Option<Decimal>,

    /// Monthly performance salary.
    #[arg(long = "performance", value_parser = parse_amount)]
    performance_salary: Option<Decimal>,

    /// Bonus size in months of the bonus base.
    #[arg(long = "bonus-months", value_parser = parse_bonus_months)]
    bonus_base_months: Option<Decimal>,

    /// Performance multiplier applied to the bonus.
    #[arg(long = "multiplier", value_parser = parse_multiplier)]
    performance_multiplier: Option<Decimal>,

    /// Social insurance contribution cap.
    #[arg(long = "si-base", value_parser = parse_amount)]
    social_insurance_base: Option<Decimal>,

    /// Housing fund contribution cap.
    #[arg(long = "hf-base", value_parser = parse_amount)]
    housing_fund_base: Option<Decimal>,

    /// Special additional deductions per month.
    #[arg(long = "deductions", value_parser = parse_amount)]
    additional_deductions: Option<Decimal>,

    /// Compute the bonus from base salary only.
    #[arg(long)]
    exclude_performance_from_bonus: bool,
}

impl From<ScenarioArgs> for ScenarioOverrides {
    fn from(args: ScenarioArgs) -> Self {
        Self {
            city: args.city,
            base_salary: args.base_salary,
            performance_salary: args.performance_salary,
            bonus_base_months: args.bonus_base_months,
            performance_multiplier: args.performance_multiplier,
            social_insurance_base: args.social_insurance_base,
            housing_fund_base: args.housing_fund_base,
            additional_deductions: args.additional_deductions,
            exclude_performance_from_bonus: args.exclude_performance_from_bonus,
        }
    }
}

#[derive(Debug, Args)]
struct PreviousArgs {
    /// Previous monthly base salary.
    #[arg(long = "prev-base", value_parser = parse_amount)]
    base_salary: Option<Decimal>,

    /// Previous monthly performance salary.
    #[arg(long = "prev-performance", value_parser = parse_amount)]
    performance_salary: Option<Decimal>,

    /// Previous bonus months.
    #[arg(long = "prev-bonus-months", value_parser = parse_bonus_months)]
    bonus_base_months: Option<Decimal>,

    /// Previous performance multiplier.
    #[arg(long = "prev-multiplier", value_parser = parse_multiplier)]
    performance_multiplier: Option<Decimal>,
}

impl From<PreviousArgs> for PreviousOverrides {
    fn from(args: PreviousArgs) -> Self {
        Self {
            base_salary: args.base_salary,
            performance_salary: args.performance_salary,
            bonus_base_months: args.bonus_base_months,
            performance_multiplier: args.performance_multiplier,
        }
    }
}

// ─── logging ─────────────────────────────────────────────────────────────────

/// Flag level first, then the configured level; RUST_LOG beats both.
fn configure_logging(
    cli_level: Option<&str>,
    cli_file: Option<&PathBuf>,
    config: &AppConfig,
) -> anyhow::Result<()> {
    if cli_level.is_none() && std::env::var_os("RUST_LOG").is_none() {
        logging::set_log_level(&config.logging.level)?;
    }
    if let Some(path) = cli_file.or(config.logging.file.as_ref()) {
        logging::enable_file_logging(path)?;
        debug!(path = %path.display(), "file logging enabled");
    }
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref().unwrap_or("info"));

    let config = AppConfig::load_or_default(cli.config.as_deref()).with_context(|| {
        match &cli.config {
            Some(path) => format!("loading configuration from '{}'", path.display()),
            None => "building default configuration".to_string(),
        }
    })?;
    configure_logging(cli.log_level.as_deref(), cli.log_file.as_ref(), &config)?;

    let mut session = Session::new(config).context("loading tax tables")?;

    match cli.command {
        Command::Evaluate {
            scenario,
            label,
            json_out,
        } => {
            let resolved = session
                .resolve(&scenario.into())
                .context("resolving scenario")?;
            let entry = session.evaluate(label, resolved.parameters);
            println!(
                "{}",
                ResultReport::new(entry.label.as_deref(), &entry.result)
            );

            if let Some(path) = json_out {
                ScenarioExport::new(resolved.city.as_deref(), &entry.parameters, &entry.result)
                    .write_json(&path)
                    .context("exporting scenario")?;
            }
        }

        Command::Sweep {
            scenario,
            start,
            end,
            step,
            csv_out,
        } => {
            let resolved = session
                .resolve(&scenario.into())
                .context("resolving scenario")?;
            let range = session.sweep_range(start, end, step);
            let rows = session
                .sweep(&resolved.parameters, range)
                .context("invalid sweep range")?;
            let thresholds = session.policy().salary_brackets.monthly_thresholds();
            print!("{}", SweepReport::new(&rows, &thresholds));

            if let Some(path) = csv_out {
                export::write_sweep_csv_file(&path, &rows).context("exporting sweep")?;
            }
        }

        Command::Compare { scenario, previous } => {
            let current = session
                .resolve(&scenario.into())
                .context("resolving scenario")?
                .parameters;
            let previous = PreviousOverrides::from(previous).apply(&current);
            let comparison = session.compare(&previous, &current);
            print!("{}", ComparisonReport::new(&comparison));
        }

        Command::Batch { file } => {
            let scenarios = csv_loader::load_from_file(&file)
                .with_context(|| format!("reading batch file '{}'", file.display()))?;
            session.run_batch(scenarios);
            print!("{}", HistoryReport::new(session.history()));
        }

        Command::Presets => {
            print!("{}", PresetsReport::new(session.presets()));
        }
    }

    info!("done");
    Ok(())
}
