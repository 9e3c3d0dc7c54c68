//! Receipt transcript extraction module.

mod parser;
pub mod rules;

pub use parser::{ParsedReceipt, RuleBasedReceiptParser};

use crate::models::expense::ExpenseItem;
use crate::models::totals::ReceiptTotals;

/// Trait for receipt parsers.
///
/// Parsing is best-effort and infallible: any input text, including an empty one,
/// yields a (possibly empty) result.
pub trait ReceiptParser {
    /// Parse a receipt from an OCR transcript.
    fn parse(&self, text: &str) -> ParsedReceipt;
}

/// Extract categorized line items from a transcript with the default rules.
pub fn parse_receipt(text: &str) -> Vec<ExpenseItem> {
    RuleBasedReceiptParser::new().parse(text).items
}

/// Reconcile subtotal, tax and total in a transcript with the default keywords.
pub fn validate_receipt_totals(text: &str) -> ReceiptTotals {
    rules::totals::TotalsValidator::new().validate(text)
}
