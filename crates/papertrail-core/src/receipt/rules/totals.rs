//! Subtotal/tax/total location and reconciliation.
//!
//! Each amount is taken from the first line that carries one of its keywords and an
//! amount token. A line holding a subtotal keyword never counts as the grand total,
//! since "subtotal" contains "total".

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::config::ValidationConfig;
use crate::models::totals::ReceiptTotals;

use super::amounts::AmountExtractor;
use super::lines::{contains_keyword, segment_lines};
use super::{ExtractionMatch, FieldExtractor};

/// Amounts located in a transcript, before reconciliation.
#[derive(Debug, Clone, Default)]
pub struct LocatedTotals {
    pub subtotal: Option<ExtractionMatch<Decimal>>,
    pub tax: Option<ExtractionMatch<Decimal>>,
    pub total: Option<ExtractionMatch<Decimal>>,
}

impl LocatedTotals {
    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.subtotal.is_none() {
            missing.push("subtotal");
        }
        if self.tax.is_none() {
            missing.push("tax");
        }
        if self.total.is_none() {
            missing.push("total");
        }
        missing
    }
}

/// Receipt totals validator.
#[derive(Debug, Clone)]
pub struct TotalsValidator {
    config: ValidationConfig,
}

impl TotalsValidator {
    /// Validator with the default keywords and a one-cent tolerance.
    pub fn new() -> Self {
        Self::from_config(&ValidationConfig::default())
    }

    pub fn from_config(config: &ValidationConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Whether a line carries any subtotal, tax or total keyword.
    pub fn is_summary_line(&self, line: &str) -> bool {
        contains_keyword(line, &self.config.subtotal_keywords)
            || contains_keyword(line, &self.config.tax_keywords)
            || contains_keyword(line, &self.config.total_keywords)
    }

    /// Locate subtotal, tax and total independently of each other.
    pub fn locate(&self, text: &str) -> LocatedTotals {
        let lines = segment_lines(text);
        let subtotal_keywords = &self.config.subtotal_keywords;

        LocatedTotals {
            subtotal: find_labeled_amount(&lines, |line| contains_keyword(line, subtotal_keywords)),
            tax: find_labeled_amount(&lines, |line| {
                contains_keyword(line, &self.config.tax_keywords)
            }),
            total: find_labeled_amount(&lines, |line| {
                contains_keyword(line, &self.config.total_keywords)
                    && !contains_keyword(line, subtotal_keywords)
            }),
        }
    }

    /// Reconcile `subtotal + tax` against the printed total.
    pub fn validate(&self, text: &str) -> ReceiptTotals {
        let located = self.locate(text);

        let (Some(subtotal), Some(tax), Some(total)) =
            (&located.subtotal, &located.tax, &located.total)
        else {
            let missing = located.missing_fields();
            debug!("Totals validation incomplete, missing {:?}", missing);
            return ReceiptTotals::failure(format!(
                "Could not find all required amounts in receipt (missing: {})",
                missing.join(", ")
            ));
        };

        let verdict =
            ReceiptTotals::reconcile(subtotal.value, tax.value, total.value, self.config.tolerance);
        debug!(
            "Totals: subtotal={} tax={} total={} matched={}",
            verdict.subtotal, verdict.tax, verdict.total, verdict.is_matched
        );
        verdict
    }
}

impl Default for TotalsValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn find_labeled_amount<F>(lines: &[&str], is_label: F) -> Option<ExtractionMatch<Decimal>>
where
    F: Fn(&str) -> bool,
{
    let amounts = AmountExtractor::new();

    lines.iter().enumerate().find_map(|(index, &line)| {
        if !is_label(line) {
            return None;
        }
        amounts.extract(line).map(|m| m.on_line(index))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn d(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    #[test]
    fn test_matching_totals() {
        let text = "Coffee 3.50\nSubtotal 10.00\nTax 1.00\nTotal 11.00";
        let verdict = TotalsValidator::new().validate(text);

        assert!(verdict.is_matched);
        assert_eq!(verdict.confidence, 1.0);
        assert_eq!(verdict.subtotal, d(1000));
        assert_eq!(verdict.tax, d(100));
        assert_eq!(verdict.total, d(1100));
    }

    #[test]
    fn test_line_order_does_not_matter() {
        let text = "Total 11.00\nTax 1.00\nSubtotal 10.00";
        let verdict = TotalsValidator::new().validate(text);
        assert!(verdict.is_matched);
        assert_eq!(verdict.confidence, 1.0);
    }

    #[test]
    fn test_mismatch_reports_expected_and_found() {
        let text = "Subtotal 10.00\nTax 1.00\nTotal 12.00";
        let verdict = TotalsValidator::new().validate(text);

        assert!(!verdict.is_matched);
        assert_eq!(verdict.confidence, 0.8);
        assert!(verdict.message.contains("11.00"), "{}", verdict.message);
        assert!(verdict.message.contains("12.00"), "{}", verdict.message);
    }

    #[test]
    fn test_missing_tax_is_a_failure_verdict() {
        let text = "Subtotal 10.00\nTotal 10.00";
        let verdict = TotalsValidator::new().validate(text);

        assert!(!verdict.is_matched);
        assert_eq!(verdict.confidence, 0.0);
        assert_eq!(verdict.total, Decimal::ZERO);
        assert!(verdict.message.contains("missing: tax"));
    }

    #[test]
    fn test_empty_text() {
        let verdict = TotalsValidator::new().validate("");
        assert!(!verdict.is_matched);
        assert!(verdict.message.contains("subtotal, tax, total"));
    }

    #[test]
    fn test_alternate_keywords_and_symbols() {
        let text = "SUB-TOTAL: $20.00\nGST $1.00\nAMOUNT DUE $21.00";
        let verdict = TotalsValidator::new().validate(text);
        assert!(verdict.is_matched, "{}", verdict.message);
    }

    #[test]
    fn test_keyword_line_without_amount_is_skipped() {
        let text = "TOTAL SAVINGS TODAY!\nSubtotal 5.00\nTax 0.40\nTotal 5.40";
        let located = TotalsValidator::new().locate(text);
        assert_eq!(located.total.unwrap().line, Some(3));
    }

    #[test]
    fn test_is_summary_line() {
        let validator = TotalsValidator::new();
        assert!(validator.is_summary_line("Sales Tax 0.80"));
        assert!(!validator.is_summary_line("Coffee 3.50"));
    }

    #[test]
    fn test_custom_tolerance() {
        let config = ValidationConfig {
            tolerance: d(10),
            ..ValidationConfig::default()
        };
        let text = "Subtotal 10.00\nTax 1.00\nTotal 11.05";
        assert!(TotalsValidator::from_config(&config).validate(text).is_matched);
        assert!(!TotalsValidator::new().validate(text).is_matched);
    }
}
