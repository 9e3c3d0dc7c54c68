//! Line item extraction: a description followed by a trailing price.

use rust_decimal::Decimal;
use tracing::trace;

use super::amounts::AmountExtractor;
use super::lines::{collapse_whitespace, segment_lines};
use super::{ExtractionMatch, FieldExtractor};

/// Uncategorized item recovered from one transcript line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub name: String,
    pub amount: Decimal,
}

/// Line item extractor.
pub struct LineItemExtractor {
    amounts: AmountExtractor,
}

impl LineItemExtractor {
    pub fn new() -> Self {
        Self {
            amounts: AmountExtractor::new(),
        }
    }
}

impl Default for LineItemExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for LineItemExtractor {
    type Output = ExtractionMatch<LineItem>;

    /// Item on a single line: the last amount token is the price and everything
    /// before it is the name, which may be empty.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        let line = text.trim();
        let price = self.amounts.extract_last(line)?;
        let (start, end) = price.position?;

        let name = collapse_whitespace(&line[..start]);
        if name.is_empty() {
            trace!("Bare price line: {:?}", line);
        }

        Some(
            ExtractionMatch::new(
                LineItem {
                    name,
                    amount: price.value,
                },
                price.confidence,
                line,
            )
            .with_position(start, end),
        )
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        segment_lines(text)
            .into_iter()
            .enumerate()
            .filter_map(|(index, line)| self.extract(line).map(|m| m.on_line(index)))
            .collect()
    }
}
