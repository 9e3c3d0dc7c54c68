//! Amount extraction for receipt transcripts.
//!
//! Amounts are fixed-point tokens with exactly two fractional digits and an optional
//! leading `$`. Tokens that run straight into another digit (`12.345`) are not amounts.

use std::str::FromStr;

use regex::Captures;
use rust_decimal::Decimal;
use tracing::trace;

use super::patterns::AMOUNT_PATTERN;
use super::{ExtractionMatch, FieldExtractor};

/// Amount field extractor.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Last amount on a line, the usual place for an item price.
    pub fn extract_last(&self, text: &str) -> Option<ExtractionMatch<Decimal>> {
        self.extract_all(text).into_iter().last()
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for caps in AMOUNT_PATTERN.captures_iter(text) {
            let Some(full_match) = caps.get(0) else {
                continue;
            };

            if followed_by_digit(text, full_match.end()) {
                trace!("Skipping amount-like token inside a longer number: {}", full_match.as_str());
                continue;
            }

            match token_value(&caps) {
                Some(amount) => {
                    let confidence = if caps.get(1).is_some() { 0.9 } else { 0.8 };
                    results.push(
                        ExtractionMatch::new(amount, confidence, full_match.as_str())
                            .with_position(full_match.start(), full_match.end()),
                    );
                }
                None => trace!("Dropping malformed amount token: {}", full_match.as_str()),
            }
        }

        results
    }
}

fn followed_by_digit(text: &str, end: usize) -> bool {
    text[end..].chars().next().is_some_and(|c| c.is_ascii_digit())
}

fn token_value(caps: &Captures<'_>) -> Option<Decimal> {
    caps.get(2).and_then(|m| parse_amount(m.as_str()))
}

/// Parse an amount token such as `"$3.50"` or `"12.00"`.
///
/// Returns `None` for anything that does not convert exactly to a non-negative decimal
/// with two fractional digits. Values too large to keep their cents are rounded by the
/// conversion and rejected here.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned = s.trim().trim_start_matches('$');
    Decimal::from_str(cleaned)
        .ok()
        .filter(|amount| !amount.is_sign_negative() && amount.scale() == 2)
}

/// Format an amount with two decimals and a dollar sign.
pub fn format_amount(amount: Decimal) -> String {
    if amount.is_sign_negative() {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${:.2}", amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("3.50"), Some(Decimal::new(350, 2)));
        assert_eq!(parse_amount("$12.00"), Some(Decimal::new(1200, 2)));
        assert_eq!(parse_amount("-1.00"), None);
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn test_parse_amount_keeps_two_decimal_scale() {
        assert_eq!(parse_amount("10.00").unwrap().to_string(), "10.00");
    }

    #[test]
    fn test_amount_too_large_for_cents_is_dropped() {
        assert_eq!(parse_amount("79228162514264337593543950335.00"), None);
        assert_eq!(parse_amount("99999999999999999999999999999999999.99"), None);

        let extractor = AmountExtractor::new();
        let results = extractor.extract_all("A 79228162514264337593543950335.00 B 1.00");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].value, Decimal::new(100, 2));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Decimal::new(550, 2)), "$5.50");
        assert_eq!(format_amount(Decimal::new(-500, 2)), "-$5.00");
    }

    #[test]
    fn test_extract_all_amounts() {
        let extractor = AmountExtractor::new();
        let results = extractor.extract_all("2 @ $1.25 = 2.50");

        let values: Vec<Decimal> = results.iter().map(|m| m.value).collect();
        assert_eq!(values, vec![Decimal::new(125, 2), Decimal::new(250, 2)]);
        assert_eq!(results[0].source, "$1.25");
        assert_eq!(results[0].position, Some((4, 9)));
    }

    #[test]
    fn test_requires_exactly_two_decimals() {
        let extractor = AmountExtractor::new();
        assert!(extractor.extract("Qty 3").is_none());
        assert!(extractor.extract("Weight 1.5 lb").is_none());
        assert!(extractor.extract("Ref 12.345").is_none());
    }

    #[test]
    fn test_extract_last() {
        let extractor = AmountExtractor::new();
        let last = extractor.extract_last("Bananas 0.59 /lb 1.18").unwrap();
        assert_eq!(last.value, Decimal::new(118, 2));
    }
}
