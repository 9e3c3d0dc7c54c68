//! Error types for the papertrail-core library.
//!
//! Receipt parsing itself never fails: missing fields are `None`, unreconciled totals
//! are a [`ReceiptTotals`](crate::ReceiptTotals) verdict. These errors cover the
//! surrounding concerns (configuration, persisted budget state, label lookups).

use thiserror::Error;

/// Main error type for the papertrail library.
#[derive(Error, Debug)]
pub enum PapertrailError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Unknown spending category label.
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// Unknown budget period label.
    #[error("unknown budget period: {0}")]
    UnknownPeriod(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the papertrail library.
pub type Result<T> = std::result::Result<T, PapertrailError>;
