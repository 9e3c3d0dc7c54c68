//! Parse command - extract items from a single receipt transcript.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use papertrail_core::{ReceiptParser, RuleBasedReceiptParser};

use super::output::{format_receipt, OutputFormat};
use super::{load_config, read_transcript};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Transcript file (`-` for stdin)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Date format to try, in order (overrides the configured list)
    #[arg(long = "date-format")]
    date_formats: Vec<String>,

    /// Leave subtotal/tax/total lines out of the items
    #[arg(long)]
    exclude_summary: bool,

    /// Report parse warnings on stderr
    #[arg(long)]
    show_warnings: bool,

    /// Fail when subtotal + tax does not reconcile with the total
    #[arg(long)]
    validate: bool,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if !args.date_formats.is_empty() {
        config.parsing.date_formats = args.date_formats.clone();
    }
    if args.exclude_summary {
        config.parsing.exclude_summary_lines = true;
    }
    config.validate()?;

    let text = read_transcript(&args.input)?;
    info!("Parsing transcript: {}", args.input.display());

    let parser = RuleBasedReceiptParser::from_config(&config);
    let receipt = parser.parse(&text);

    if args.show_warnings && !receipt.warnings.is_empty() {
        eprintln!("{}", style("Parse warnings:").yellow());
        for warning in &receipt.warnings {
            eprintln!("  - {}", warning);
        }
    }

    let output = format_receipt(&receipt, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    if args.validate && !receipt.totals.is_matched {
        anyhow::bail!("Totals did not reconcile: {}", receipt.totals.message);
    }

    Ok(())
}
