//! Date extraction for receipt transcripts.
//!
//! Lines are scanned in document order and every configured format is tried on each
//! line before moving to the next one, so the first dated line wins. Day/month
//! ambiguity is settled by format order alone.

use chrono::NaiveDate;
use tracing::debug;

use super::lines::segment_lines;
use super::patterns::DEFAULT_DATE_FORMATS;
use super::{ExtractionMatch, FieldExtractor};

/// Date field extractor.
#[derive(Debug, Clone)]
pub struct DateExtractor {
    formats: Vec<String>,
}

impl DateExtractor {
    /// Extractor using the default US-first format list.
    pub fn new() -> Self {
        Self::with_formats(DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()))
    }

    /// Extractor with a custom ordered format list (chrono syntax).
    pub fn with_formats<I, S>(formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            formats: formats
                .into_iter()
                .map(Into::into)
                .filter(|f: &String| !f.trim().is_empty())
                .collect(),
        }
    }

    /// Find a date in a single line, trying formats in order.
    pub fn extract_from_line(&self, line: &str) -> Option<ExtractionMatch<NaiveDate>> {
        for format in &self.formats {
            for start in word_starts(line) {
                let candidate = &line[start..];
                let Ok((date, rest)) = NaiveDate::parse_and_remainder(candidate, format) else {
                    continue;
                };

                if !ends_at_boundary(rest) {
                    continue;
                }

                let end = line.len() - rest.len();
                debug!("Matched date {} with format {:?}", date, format);
                return Some(
                    ExtractionMatch::new(date, 0.9, line[start..end].trim())
                        .with_position(start, end),
                );
            }
        }

        None
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        segment_lines(text)
            .into_iter()
            .enumerate()
            .find_map(|(index, line)| self.extract_from_line(line).map(|m| m.on_line(index)))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        segment_lines(text)
            .into_iter()
            .enumerate()
            .filter_map(|(index, line)| self.extract_from_line(line).map(|m| m.on_line(index)))
            .collect()
    }
}

/// Byte offsets where a token can begin: the line start and every position after a
/// non-alphanumeric character.
fn word_starts(line: &str) -> impl Iterator<Item = usize> + '_ {
    let mut previous: Option<char> = None;
    line.char_indices().filter_map(move |(i, c)| {
        let at_boundary = previous.is_none_or(|p| !p.is_alphanumeric());
        previous = Some(c);
        (at_boundary && !c.is_whitespace()).then_some(i)
    })
}

fn ends_at_boundary(rest: &str) -> bool {
    rest.chars().next().is_none_or(|c| !c.is_alphanumeric())
}
