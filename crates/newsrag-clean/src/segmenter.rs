//! Sentence segmentation of serialized-list article bodies
//!
//! Scraped bodies arrive as the text form of a list of paragraphs, e.g.
//! `['First paragraph.', "Second one's here."]`. The segmenter unwraps that
//! list and cuts it into sentence-like fragments. It is a heuristic: it
//! over-splits after abbreviations followed by a capitalized word and never
//! splits where a delimiter is missing.

use regex::Regex;
use std::sync::LazyLock;

use newsrag_core::{Error, Result};

// Separators left by list serialization: ', ' and ", " plus the mixed forms
static LIST_DELIMITER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"['"], ['"]"#).unwrap());

// Sentence end followed by whitespace and a capital
static SENTENCE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+[A-Z]").unwrap());

/// Split raw content into trimmed, non-empty fragments. Never fails.
pub fn segment(raw: &str) -> Vec<String> {
    let inner = strip_list_wrapper(raw);
    if inner.is_empty() {
        return Vec::new();
    }

    LIST_DELIMITER
        .split(inner)
        .flat_map(split_sentences)
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Like [`segment`], but rejects content that is not a bracket-delimited list
pub fn segment_checked(raw: &str) -> Result<Vec<String>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if !(trimmed.starts_with('[') && trimmed.ends_with(']')) {
        let preview: String = trimmed.chars().take(40).collect();
        return Err(Error::MalformedContent(format!(
            "expected a bracket-delimited list, got {:?}",
            preview
        )));
    }

    Ok(segment(trimmed))
}

/// Remove the surrounding brackets and the outer quote of the first and last item
fn strip_list_wrapper(raw: &str) -> &str {
    let inner = raw
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim();

    let inner = inner
        .strip_prefix(['\'', '"'])
        .unwrap_or(inner);
    inner.strip_suffix(['\'', '"']).unwrap_or(inner)
}

/// Cut after `.`, `!` or `?` when whitespace and a capital letter follow.
/// The punctuation stays with the left piece.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;

    for boundary in SENTENCE_BOUNDARY.find_iter(text) {
        // punctuation and capital are single ASCII bytes
        pieces.push(&text[start..boundary.start() + 1]);
        start = boundary.end() - 1;
    }
    pieces.push(&text[start..]);

    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(segment("").is_empty());
        assert!(segment("[]").is_empty());
        assert!(segment("['']").is_empty());
        assert!(segment_checked("   ").unwrap().is_empty());
    }

    #[test]
    fn test_splits_list_items_and_sentences() {
        let fragments = segment("['Hello world. This is a test.', 'Second item!', \"It's third.\"]");
        assert_eq!(
            fragments,
            vec!["Hello world.", "This is a test.", "Second item!", "It's third."]
        );
    }

    #[test]
    fn test_keeps_lowercase_continuations_together() {
        let fragments = segment("['Leaders from the U.S. and U.K. met on Monday.']");
        assert_eq!(fragments, vec!["Leaders from the U.S. and U.K. met on Monday."]);
    }

    #[test]
    fn test_over_splits_before_capitalized_words() {
        let fragments = segment("['Officials in the U.S. Senate voted.']");
        assert_eq!(fragments, vec!["Officials in the U.S.", "Senate voted."]);
    }

    #[test]
    fn test_mixed_quote_delimiters() {
        let fragments = segment(r#"['one', "two's", 'three']"#);
        assert_eq!(fragments, vec!["one", "two's", "three"]);
    }

    #[test]
    fn test_question_and_exclamation_boundaries() {
        let fragments = segment("['Is it over? Nobody knows! Stay tuned.']");
        assert_eq!(fragments, vec!["Is it over?", "Nobody knows!", "Stay tuned."]);
    }

    #[test]
    fn test_non_ascii_text_is_split_on_char_boundaries() {
        let fragments = segment("['Café opens. Zürich grows. Ärger folgt.']");
        assert_eq!(fragments, vec!["Café opens.", "Zürich grows. Ärger folgt."]);
    }

    #[test]
    fn test_segment_checked_rejects_plain_text() {
        let result = segment_checked("Just a plain paragraph.");
        assert!(matches!(result, Err(Error::MalformedContent(_))));
    }

    #[test]
    fn test_segment_checked_accepts_list() {
        let fragments = segment_checked("  ['A sentence.']  ").unwrap();
        assert_eq!(fragments, vec!["A sentence."]);
    }
}
