//! Common regex patterns and keyword defaults for receipt extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Fixed-point currency amount, optional dollar sign: $3.50, 12.00
    pub static ref AMOUNT_PATTERN: Regex = Regex::new(
        r"(\$)?(\d+\.\d{2})"
    ).unwrap();

    // Runs of whitespace, collapsed in item names
    pub static ref WHITESPACE: Regex = Regex::new(
        r"\s+"
    ).unwrap();
}

/// Date formats tried on every line, in priority order (US month/day first).
pub const DEFAULT_DATE_FORMATS: &[&str] = &[
    "%m/%d/%Y",
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%b %d, %Y",
    "%d %b %Y",
];

pub const SUBTOTAL_KEYWORDS: &[&str] = &["subtotal", "sub total", "sub-total"];

pub const TAX_KEYWORDS: &[&str] = &["tax", "vat", "gst"];

pub const TOTAL_KEYWORDS: &[&str] = &["total", "amount due", "final total"];
