//! Receipt totals reconciliation verdict.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Confidence reported when subtotal + tax reconciles with the total.
pub const MATCHED_CONFIDENCE: f64 = 1.0;

/// Confidence reported when all three amounts were found but disagree.
pub const MISMATCHED_CONFIDENCE: f64 = 0.8;

/// Result of checking `subtotal + tax ≈ total` on one transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptTotals {
    /// Whether the printed total reconciles.
    pub is_matched: bool,

    pub subtotal: Decimal,

    pub tax: Decimal,

    pub total: Decimal,

    /// Verdict confidence (0.0 - 1.0).
    pub confidence: f64,

    /// Human-readable verdict.
    pub message: String,
}

impl ReceiptTotals {
    /// Verdict for a transcript where the required amounts could not be located.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            is_matched: false,
            subtotal: Decimal::ZERO,
            tax: Decimal::ZERO,
            total: Decimal::ZERO,
            confidence: 0.0,
            message: message.into(),
        }
    }

    /// Verdict for three located amounts, compared within `tolerance`.
    ///
    /// Amounts too large to add up yield a failure verdict.
    pub fn reconcile(subtotal: Decimal, tax: Decimal, total: Decimal, tolerance: Decimal) -> Self {
        let Some((calculated, gap)) = subtotal
            .checked_add(tax)
            .and_then(|calculated| Some((calculated, calculated.checked_sub(total)?)))
        else {
            return Self::failure("Receipt amounts are out of range");
        };
        let is_matched = gap.abs() < tolerance;

        let (confidence, message) = if is_matched {
            (MATCHED_CONFIDENCE, "Receipt totals match".to_string())
        } else {
            (
                MISMATCHED_CONFIDENCE,
                format!(
                    "Receipt totals do not match (expected: {}, found: {})",
                    calculated, total
                ),
            )
        };

        Self {
            is_matched,
            subtotal,
            tax,
            total,
            confidence,
            message,
        }
    }

    /// Whether subtotal, tax and total were all located.
    pub fn is_complete(&self) -> bool {
        self.confidence > 0.0
    }

    /// Signed gap between the printed total and subtotal + tax.
    pub fn discrepancy(&self) -> Option<Decimal> {
        self.subtotal
            .checked_add(self.tax)
            .and_then(|calculated| self.total.checked_sub(calculated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn d(units: i64) -> Decimal {
        Decimal::new(units, 2)
    }

    #[test]
    fn test_reconcile_within_tolerance() {
        let verdict = ReceiptTotals::reconcile(d(1000), d(100), d(1100), d(1));
        assert!(verdict.is_matched);
        assert_eq!(verdict.confidence, 1.0);
        assert_eq!(verdict.message, "Receipt totals match");
        assert_eq!(verdict.discrepancy(), Some(Decimal::ZERO));
    }

    #[test]
    fn test_one_cent_off_is_a_mismatch() {
        // Tolerance is exclusive.
        let verdict = ReceiptTotals::reconcile(d(1000), d(100), d(1101), d(1));
        assert!(!verdict.is_matched);
        assert_eq!(verdict.confidence, 0.8);
        assert_eq!(verdict.discrepancy(), Some(d(1)));
    }

    #[test]
    fn test_failure_is_incomplete() {
        let verdict = ReceiptTotals::failure("nothing found");
        assert!(!verdict.is_matched);
        assert!(!verdict.is_complete());
        assert_eq!(verdict.total, Decimal::ZERO);
        assert_eq!(verdict.message, "nothing found");
    }

    #[test]
    fn test_overflowing_amounts_fail_instead_of_panicking() {
        let verdict = ReceiptTotals::reconcile(Decimal::MAX, Decimal::MAX, d(100), d(1));
        assert!(!verdict.is_matched);
        assert!(!verdict.is_complete());
        assert_eq!(verdict.message, "Receipt amounts are out of range");

        let verdict = ReceiptTotals::reconcile(Decimal::ZERO, Decimal::MAX, Decimal::MIN, d(1));
        assert!(!verdict.is_complete());
    }
}
