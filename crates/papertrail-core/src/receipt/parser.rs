//! Rule-based receipt parser combining the line-level extractors.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::config::PapertrailConfig;
use crate::models::expense::{Category, ExpenseItem};
use crate::models::totals::ReceiptTotals;
use crate::summary::{aggregate, ExpenseSummary};

use super::rules::{
    lines::segment_lines, patterns::AMOUNT_PATTERN, CategoryTable, DateExtractor, FieldExtractor,
    LineItemExtractor, TotalsValidator,
};
use super::ReceiptParser;

/// Everything recovered from one transcript.
///
/// `items` and `totals` come from independent passes and may disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedReceipt {
    /// Merchant name, usually the first text-only line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,

    /// Receipt date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    /// Categorized line items, in document order.
    pub items: Vec<ExpenseItem>,

    /// Subtotal/tax/total verdict.
    pub totals: ReceiptTotals,

    /// Parse warnings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ParsedReceipt {
    /// Per-category sums over the items.
    pub fn summary(&self) -> ExpenseSummary {
        aggregate(&self.items)
    }
}

/// Receipt parser driven by regex rules and keyword tables.
#[derive(Debug, Clone)]
pub struct RuleBasedReceiptParser {
    dates: DateExtractor,
    categories: CategoryTable,
    totals: TotalsValidator,
    /// Leave subtotal/tax/total lines out of the items.
    exclude_summary_lines: bool,
    skip_unnamed_items: bool,
}

impl RuleBasedReceiptParser {
    /// Create a parser with default formats, keywords and categories.
    pub fn new() -> Self {
        Self::from_config(&PapertrailConfig::default())
    }

    /// Create a parser from configuration.
    pub fn from_config(config: &PapertrailConfig) -> Self {
        Self {
            dates: DateExtractor::with_formats(config.parsing.date_formats.iter().cloned()),
            categories: CategoryTable::from_config(&config.categories),
            totals: TotalsValidator::from_config(&config.validation),
            exclude_summary_lines: config.parsing.exclude_summary_lines,
            skip_unnamed_items: config.parsing.skip_unnamed_items,
        }
    }

    /// Set the ordered date format list.
    pub fn with_date_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dates = DateExtractor::with_formats(formats);
        self
    }

    /// Set summary line exclusion.
    pub fn with_summary_lines_excluded(mut self, exclude: bool) -> Self {
        self.exclude_summary_lines = exclude;
        self
    }

    /// Drop price-only lines instead of emitting items with an empty name.
    pub fn with_unnamed_items_skipped(mut self, skip: bool) -> Self {
        self.skip_unnamed_items = skip;
        self
    }

    /// Category for a single item name.
    pub fn categorize(&self, name: &str) -> Category {
        self.categories.categorize(name)
    }

    /// Reconcile subtotal, tax and total without extracting items.
    pub fn validate_totals(&self, text: &str) -> ReceiptTotals {
        self.totals.validate(text)
    }

    fn extract_store_name(&self, lines: &[&str]) -> Option<String> {
        lines
            .iter()
            .find(|line| {
                !line.is_empty()
                    && !line.contains('$')
                    && !AMOUNT_PATTERN.is_match(line)
                    && self.dates.extract_from_line(line).is_none()
            })
            .map(|line| line.to_string())
    }

    fn extract_items(&self, text: &str, date: Option<NaiveDate>) -> Vec<ExpenseItem> {
        let extractor = LineItemExtractor::new();

        extractor
            .extract_all(text)
            .into_iter()
            .filter(|m| !(self.exclude_summary_lines && self.totals.is_summary_line(&m.source)))
            .filter(|m| !(self.skip_unnamed_items && m.value.name.is_empty()))
            .map(|m| {
                let category = self.categories.categorize(&m.value.name);
                debug!(
                    "Item {:?} {} -> {} (confidence {:.2})",
                    m.value.name, m.value.amount, category, m.confidence
                );
                ExpenseItem::new(m.value.name, m.value.amount, category).with_date(date)
            })
            .collect()
    }
}

impl Default for RuleBasedReceiptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiptParser for RuleBasedReceiptParser {
    fn parse(&self, text: &str) -> ParsedReceipt {
        let mut warnings = Vec::new();

        info!("Parsing receipt from {} characters of text", text.len());

        let lines = segment_lines(text);
        let store_name = self.extract_store_name(&lines);

        let date = self.dates.extract(text).map(|m| m.value);
        if date.is_none() {
            warnings.push("Could not extract receipt date".to_string());
        }

        let items = self.extract_items(text, date);
        if items.is_empty() {
            warnings.push("Could not extract line items".to_string());
        }

        let totals = self.totals.validate(text);
        if !totals.is_matched {
            warnings.push(totals.message.clone());
        }

        info!(
            "Parsed {} items, date {:?}, totals matched: {}",
            items.len(),
            date,
            totals.is_matched
        );

        ParsedReceipt {
            store_name,
            date,
            items,
            totals,
            warnings,
        }
    }
}
