//! Line segmentation.

use super::patterns::WHITESPACE;

/// Split a transcript into trimmed lines, keeping blank lines so indices match the source.
pub fn segment_lines(text: &str) -> Vec<&str> {
    text.lines().map(str::trim).collect()
}

/// Trim and collapse internal whitespace runs to single spaces.
pub fn collapse_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s.trim(), " ").into_owned()
}

/// Whether `line` contains any of `keywords`, ignoring case.
pub fn contains_keyword(line: &str, keywords: &[String]) -> bool {
    let lower = line.to_lowercase();
    keywords
        .iter()
        .filter(|k| !k.is_empty())
        .any(|k| lower.contains(&k.to_lowercase()))
}
