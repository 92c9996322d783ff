//! Boilerplate truncation
//!
//! Newsletter prompts, cookie notices and similar trailers follow the article
//! body, so everything from the first fragment containing a stop phrase on is
//! cut. One source also prepends a fixed site banner, handled by the
//! [`PrefixRule`] before stop phrases are scanned.

use crate::config::{CleaningConfig, PrefixRule};

/// Outcome of truncating one article's fragments
#[derive(Debug, Clone, PartialEq)]
pub struct Truncation<'a> {
    /// Contiguous run of the input that survives
    pub kept: &'a [String],
    /// Leading fragments removed by the prefix rule
    pub prefix_dropped: usize,
    /// Index, relative to the post-prefix sequence, of the first stop-phrase fragment
    pub stopped_at: Option<usize>,
}

impl Truncation<'_> {
    pub fn is_truncated(&self) -> bool {
        self.prefix_dropped > 0 || self.stopped_at.is_some()
    }
}

/// Apply the prefix rule, then cut at the first stop phrase
pub fn truncate<'a>(fragments: &'a [String], config: &CleaningConfig) -> Truncation<'a> {
    let prefix_dropped = config
        .prefix_rule
        .as_ref()
        .map_or(0, |rule| prefix_len(fragments, rule));

    let body = &fragments[prefix_dropped..];
    let stopped_at = stop_index(body, &config.stop_phrases);
    let kept = match stopped_at {
        Some(index) => &body[..index],
        None => body,
    };

    Truncation {
        kept,
        prefix_dropped,
        stopped_at,
    }
}

/// Number of leading fragments the rule removes. Zero unless fragment zero carries the marker.
pub fn prefix_len(fragments: &[String], rule: &PrefixRule) -> usize {
    match fragments.first() {
        Some(first) if first.contains(rule.marker.as_str()) => {}
        _ => return 0,
    }

    if let Some(pattern) = rule.resume_after.as_deref() {
        if let Some(position) = fragments.iter().position(|f| f.contains(pattern)) {
            return position + 1;
        }
    }

    rule.drop_count.min(fragments.len())
}

/// First fragment containing any stop phrase (case-sensitive)
pub fn stop_index(fragments: &[String], stop_phrases: &[String]) -> Option<usize> {
    fragments.iter().position(|fragment| {
        stop_phrases
            .iter()
            .any(|phrase| fragment.contains(phrase.as_str()))
    })
}
