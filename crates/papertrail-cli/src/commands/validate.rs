//! Validate command - reconcile subtotal, tax and total on a transcript.

use std::path::PathBuf;

use clap::Args;
use console::style;

use papertrail_core::RuleBasedReceiptParser;

use super::output::format_totals_text;
use super::{load_config, read_transcript};

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Transcript file (`-` for stdin)
    #[arg(required = true)]
    input: PathBuf,

    /// Print the verdict as JSON
    #[arg(long)]
    json: bool,

    /// Exit with an error when the totals do not reconcile
    #[arg(long)]
    strict: bool,
}

pub async fn run(args: ValidateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let text = read_transcript(&args.input)?;

    let verdict = RuleBasedReceiptParser::from_config(&config).validate_totals(&text);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    } else {
        let marker = if verdict.is_matched {
            style("✓").green()
        } else {
            style("✗").red()
        };
        println!("{} {}", marker, args.input.display());
        print!("{}", format_totals_text(&verdict));
    }

    if args.strict && !verdict.is_matched {
        anyhow::bail!("Totals did not reconcile: {}", verdict.message);
    }

    Ok(())
}
