//! Core library for receipt transcript processing.
//!
//! This crate provides:
//! - Line item extraction from OCR transcripts (name + fixed-point amount)
//! - Receipt date and store name detection
//! - Keyword-table spending categorization
//! - Subtotal/tax/total reconciliation
//! - Expense aggregation and budget tracking

pub mod error;
pub mod models;
pub mod receipt;
pub mod summary;

pub use error::{PapertrailError, Result};
pub use models::budget::{Budget, BudgetPeriod, BudgetState};
pub use models::config::PapertrailConfig;
pub use models::expense::{Category, ExpenseItem};
pub use models::totals::ReceiptTotals;
pub use receipt::{
    parse_receipt, validate_receipt_totals, ParsedReceipt, ReceiptParser, RuleBasedReceiptParser,
};
pub use summary::{aggregate, CategoryTotal, ExpenseSummary};
