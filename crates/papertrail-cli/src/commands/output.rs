//! Output formatting for parsed receipts and summaries.

use papertrail_core::models::budget::Budget;
use papertrail_core::receipt::rules::amounts::format_amount;
use papertrail_core::{ExpenseSummary, ParsedReceipt, ReceiptTotals};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub fn format_receipt(receipt: &ParsedReceipt, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(receipt)?),
        OutputFormat::Csv => format_receipt_csv(receipt),
        OutputFormat::Text => Ok(format_receipt_text(receipt)),
    }
}

fn format_receipt_csv(receipt: &ParsedReceipt) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["name", "amount", "category", "date"])?;

    for item in &receipt.items {
        wtr.write_record([
            item.name.clone(),
            item.amount.to_string(),
            item.category.label().to_string(),
            item.date.map(|d| d.to_string()).unwrap_or_default(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_receipt_text(receipt: &ParsedReceipt) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Store: {}\n",
        receipt.store_name.as_deref().unwrap_or("(unknown)")
    ));
    output.push_str(&format!(
        "Date: {}\n",
        receipt.date.map(|d| d.to_string()).unwrap_or_else(|| "(unknown)".to_string())
    ));
    output.push('\n');

    output.push_str("Items:\n");
    for item in &receipt.items {
        output.push_str(&format!(
            "  {:<30} {:>10}  {}\n",
            item.name,
            format_amount(item.amount),
            item.category
        ));
    }
    output.push('\n');

    output.push_str(&format_summary_text(&receipt.summary()));
    output.push('\n');
    output.push_str(&format_totals_text(&receipt.totals));

    if !receipt.warnings.is_empty() {
        output.push_str("\nWarnings:\n");
        for warning in &receipt.warnings {
            output.push_str(&format!("  - {}\n", warning));
        }
    }

    output
}

pub fn format_totals_text(totals: &ReceiptTotals) -> String {
    let mut output = String::new();

    output.push_str("Totals:\n");
    if totals.is_complete() {
        output.push_str(&format!("  Subtotal: {}\n", format_amount(totals.subtotal)));
        output.push_str(&format!("  Tax:      {}\n", format_amount(totals.tax)));
        output.push_str(&format!("  Total:    {}\n", format_amount(totals.total)));
    }
    output.push_str(&format!(
        "  {} (confidence {:.0}%)\n",
        totals.message,
        totals.confidence * 100.0
    ));

    output
}

pub fn format_summary_text(summary: &ExpenseSummary) -> String {
    let mut output = String::new();

    output.push_str("Spending by category:\n");
    for entry in &summary.by_category {
        let share = summary.share(entry.category).unwrap_or_default() * 100.0;
        output.push_str(&format!(
            "  {:<20} {:>10}  {:>5.1}%  ({} items)\n",
            entry.category.label(),
            format_amount(entry.amount),
            share,
            entry.item_count
        ));
    }
    output.push_str(&format!("  {:<20} {:>10}\n", "TOTAL", format_amount(summary.total)));

    output
}

pub fn format_summary_csv(summary: &ExpenseSummary) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["category", "amount", "item_count"])?;
    for entry in &summary.by_category {
        wtr.write_record([
            entry.category.label().to_string(),
            entry.amount.to_string(),
            entry.item_count.to_string(),
        ])?;
    }
    wtr.write_record(["TOTAL".to_string(), summary.total.to_string(), String::new()])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

pub fn format_budgets_text(budgets: &[Budget]) -> String {
    let mut output = String::new();

    output.push_str("Budgets:\n");
    for budget in budgets {
        let progress = budget
            .progress()
            .map(|p| format!("{:.0}%", p * 100.0))
            .unwrap_or_else(|| "-".to_string());
        let flag = if budget.is_over_budget() { "  OVER" } else { "" };

        output.push_str(&format!(
            "  {:<20} {:<8} {:>10} of {:>10}  {:>5}{}\n",
            budget.category.label(),
            budget.period.to_string(),
            format_amount(budget.spent),
            format_amount(budget.amount),
            progress,
            flag
        ));
    }

    output
}
