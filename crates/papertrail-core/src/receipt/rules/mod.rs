//! Rule-based field extractors for receipt transcripts.

pub mod amounts;
pub mod categories;
pub mod dates;
pub mod items;
pub mod lines;
pub mod patterns;
pub mod totals;

pub use amounts::{parse_amount, AmountExtractor};
pub use categories::CategoryTable;
pub use dates::DateExtractor;
pub use items::{LineItem, LineItemExtractor};
pub use lines::{collapse_whitespace, segment_lines};
pub use totals::TotalsValidator;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// Extraction context with confidence scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Byte range in the source line.
    pub position: Option<(usize, usize)>,
    /// Zero-based index of the source line.
    pub line: Option<usize>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            line: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }

    pub fn on_line(mut self, index: usize) -> Self {
        self.line = Some(index);
        self
    }
}
