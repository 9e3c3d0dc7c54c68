//! Budget command - rolling daily/weekly/monthly spending fed by receipts.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand};
use console::style;
use rust_decimal::Decimal;
use tracing::info;

use papertrail_core::models::budget::PeriodBudget;
use papertrail_core::receipt::rules::amounts::format_amount;
use papertrail_core::{BudgetPeriod, BudgetState, RuleBasedReceiptParser};

use super::output::format_totals_text;
use super::{load_config, read_transcript};

/// Arguments for the budget command.
#[derive(Args)]
pub struct BudgetArgs {
    /// Budget state file (default: data directory)
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: BudgetCommand,
}

#[derive(Subcommand)]
enum BudgetCommand {
    /// Show limits and spending for each period
    Show {
        /// Print the state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set the daily, weekly and monthly limits
    Set {
        #[arg(long)]
        daily: Decimal,
        #[arg(long)]
        weekly: Decimal,
        #[arg(long)]
        monthly: Decimal,
    },

    /// Validate a transcript and add its total to every period
    Record {
        /// Transcript file (`-` for stdin)
        input: PathBuf,

        /// Day to record the receipt on (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show budget state file path
    Path,
}

pub async fn run(args: BudgetArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let state_path = args.state.unwrap_or_else(default_state_path);

    match args.command {
        BudgetCommand::Show { json } => show_budget(&state_path, json),
        BudgetCommand::Set {
            daily,
            weekly,
            monthly,
        } => set_limits(&state_path, daily, weekly, monthly),
        BudgetCommand::Record { input, date } => {
            record_receipt(&state_path, &input, date, config_path)
        }
        BudgetCommand::Path => {
            println!("Budget state: {}", state_path.display());
            Ok(())
        }
    }
}

const TRACKED_PERIODS: [BudgetPeriod; 3] =
    [BudgetPeriod::Daily, BudgetPeriod::Weekly, BudgetPeriod::Monthly];

fn default_state_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("papertrail")
        .join("budget.json")
}

fn load_state(path: &Path) -> anyhow::Result<BudgetState> {
    if path.exists() {
        Ok(BudgetState::from_file(path)?)
    } else {
        Ok(BudgetState::new())
    }
}

fn save_state(state: &BudgetState, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    state.save(path)?;
    Ok(())
}

fn show_budget(path: &Path, json: bool) -> anyhow::Result<()> {
    let mut state = load_state(path)?;
    state.roll_over(Local::now().date_naive());

    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    println!(
        "Last receipt: {}",
        state
            .last_updated
            .map(|d| d.to_string())
            .unwrap_or_else(|| "(none)".to_string())
    );
    for period in TRACKED_PERIODS {
        if let Some(budget) = state.period(period) {
            print_period(period, budget);
        }
    }

    Ok(())
}

fn print_period(label: BudgetPeriod, period: &PeriodBudget) {
    let remaining = if period.limit.is_zero() {
        style("no limit".to_string()).dim()
    } else if period.is_over_budget() {
        style(format!("{} over", format_amount(period.spent - period.limit))).red()
    } else {
        style(format!("{} left", format_amount(period.remaining()))).green()
    };

    println!(
        "  {:<8} {:>10} of {:>10}  {}",
        label.to_string(),
        format_amount(period.spent),
        format_amount(period.limit),
        remaining
    );
}

fn set_limits(path: &Path, daily: Decimal, weekly: Decimal, monthly: Decimal) -> anyhow::Result<()> {
    if [daily, weekly, monthly].iter().any(|limit| limit.is_sign_negative()) {
        anyhow::bail!("Budget limits must not be negative");
    }

    let mut state = load_state(path)?;
    state.set_limits(daily, weekly, monthly);
    save_state(&state, path)?;

    println!(
        "{} Limits set: daily {}, weekly {}, monthly {}",
        style("✓").green(),
        format_amount(daily),
        format_amount(weekly),
        format_amount(monthly)
    );

    Ok(())
}

fn record_receipt(
    path: &Path,
    input: &Path,
    date: Option<NaiveDate>,
    config_path: Option<&str>,
) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let text = read_transcript(input)?;

    let verdict = RuleBasedReceiptParser::from_config(&config).validate_totals(&text);
    let today = date.unwrap_or_else(|| Local::now().date_naive());

    let mut state = load_state(path)?;
    if !state.record_receipt(&verdict, today) {
        print!("{}", format_totals_text(&verdict));
        anyhow::bail!("Receipt not recorded: {}", verdict.message);
    }
    save_state(&state, path)?;

    info!("Budget state saved to {}", path.display());
    println!(
        "{} Recorded {} on {}",
        style("✓").green(),
        format_amount(verdict.total),
        today
    );
    for label in TRACKED_PERIODS {
        let Some(period) = state.period(label) else {
            continue;
        };
        if !period.limit.is_zero() && period.is_over_budget() {
            println!(
                "{} {} budget exceeded by {}",
                style("!").yellow(),
                label,
                format_amount(period.spent - period.limit)
            );
        }
    }

    Ok(())
}
