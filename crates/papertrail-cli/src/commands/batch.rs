//! Batch command - parse many transcripts and summarize spending.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::Local;
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::{Id, JoinError, JoinSet};
use tracing::{debug, error, warn};

use papertrail_core::models::budget::{apply_summary, Budget};
use papertrail_core::{ExpenseSummary, ParsedReceipt, ReceiptParser, RuleBasedReceiptParser};

use super::load_config;
use super::output::{format_budgets_text, format_summary_csv, format_summary_text, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for transcript files (e.g. "receipts/*.txt")
    #[arg(required = true)]
    input: String,

    /// Output format for the summary
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Leave subtotal/tax/total lines out of the items
    #[arg(long)]
    exclude_summary: bool,
}

/// Parse outcome and elapsed milliseconds of one worker.
type TaskOutput = (anyhow::Result<ParsedReceipt>, u64);

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    receipt: Option<ParsedReceipt>,
    error: Option<String>,
    processing_time_ms: u64,
}

#[derive(Serialize)]
struct BatchReport<'a> {
    receipts: Vec<ReceiptRow<'a>>,
    summary: &'a ExpenseSummary,
    budgets: &'a [Budget],
    failed: Vec<FailedRow<'a>>,
}

#[derive(Serialize)]
struct ReceiptRow<'a> {
    file: String,
    #[serde(flatten)]
    receipt: &'a ParsedReceipt,
}

#[derive(Serialize)]
struct FailedRow<'a> {
    file: String,
    error: &'a str,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if args.exclude_summary {
        config.parsing.exclude_summary_lines = true;
    }

    // Expand glob pattern
    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let parser = Arc::new(RuleBasedReceiptParser::from_config(&config));
    let permits = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut tasks: JoinSet<TaskOutput> = JoinSet::new();
    let mut task_paths = HashMap::new();

    for path in files {
        let parser = Arc::clone(&parser);
        let permits = Arc::clone(&permits);
        let task_path = path.clone();

        let handle = tasks.spawn(async move {
            let _permit = permits.acquire_owned().await;
            let file_start = Instant::now();
            let outcome = process_file(&task_path, parser).await;
            (outcome, file_start.elapsed().as_millis() as u64)
        });
        task_paths.insert(handle.id(), path);
    }

    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next_with_id().await {
        let (id, outcome, processing_time_ms) = task_outcome(joined);
        let path = task_paths.remove(&id).unwrap_or_default();
        pb.inc(1);

        match outcome {
            Ok(receipt) => results.push(FileResult {
                path,
                receipt: Some(receipt),
                error: None,
                processing_time_ms,
            }),
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(FileResult {
                        path,
                        receipt: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    pb.abandon();
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }
    }

    pb.finish_and_clear();
    results.sort_by(|a, b| a.path.cmp(&b.path));

    let mut summary = ExpenseSummary::default();
    for result in &results {
        if let Some(receipt) = &result.receipt {
            summary.add_items(&receipt.items);
            debug!("{} parsed in {}ms", result.path.display(), result.processing_time_ms);
        }
    }

    let today = Local::now().date_naive();
    let mut budgets: Vec<Budget> = config
        .budget
        .limits
        .iter()
        .map(|limit| Budget::new(limit.category, limit.amount, limit.period, today))
        .collect();
    apply_summary(&mut budgets, &summary);

    match args.format {
        OutputFormat::Json => {
            let report = BatchReport {
                receipts: results
                    .iter()
                    .filter_map(|r| {
                        r.receipt.as_ref().map(|receipt| ReceiptRow {
                            file: r.path.display().to_string(),
                            receipt,
                        })
                    })
                    .collect(),
                summary: &summary,
                budgets: &budgets,
                failed: results
                    .iter()
                    .filter_map(|r| {
                        r.error.as_deref().map(|error| FailedRow {
                            file: r.path.display().to_string(),
                            error,
                        })
                    })
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Csv => print!("{}", format_summary_csv(&summary)?),
        OutputFormat::Text => print_text_report(&results, &summary, &budgets),
    }

    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );

    Ok(())
}

/// Flatten a joined worker, turning a panicked or cancelled task into a file error.
fn task_outcome(
    joined: Result<(Id, TaskOutput), JoinError>,
) -> (Id, anyhow::Result<ParsedReceipt>, u64) {
    match joined {
        Ok((id, (outcome, elapsed))) => (id, outcome, elapsed),
        Err(e) => (e.id(), Err(anyhow::anyhow!("Worker failed: {}", e)), 0),
    }
}

async fn process_file(
    path: &Path,
    parser: Arc<RuleBasedReceiptParser>,
) -> anyhow::Result<ParsedReceipt> {
    let text = tokio::fs::read_to_string(path).await?;
    if text.trim().is_empty() {
        anyhow::bail!("Transcript is empty");
    }

    let receipt = tokio::task::spawn_blocking(move || parser.parse(&text)).await?;
    Ok(receipt)
}

fn print_text_report(results: &[FileResult], summary: &ExpenseSummary, budgets: &[Budget]) {
    println!("Receipts:");
    for result in results {
        match (&result.receipt, &result.error) {
            (Some(receipt), _) => {
                let marker = if receipt.totals.is_matched {
                    style("✓").green()
                } else {
                    style("!").yellow()
                };
                println!(
                    "  {} {}  {}  {} items  {}",
                    marker,
                    result.path.display(),
                    receipt.store_name.as_deref().unwrap_or("(unknown store)"),
                    receipt.items.len(),
                    receipt
                        .date
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "(no date)".to_string())
                );
            }
            (None, error) => {
                println!(
                    "  {} {}  {}",
                    style("✗").red(),
                    result.path.display(),
                    error.as_deref().unwrap_or("unknown error")
                );
            }
        }
    }
    println!();

    print!("{}", format_summary_text(summary));

    if !budgets.is_empty() {
        println!();
        print!("{}", format_budgets_text(budgets));
    }
}
