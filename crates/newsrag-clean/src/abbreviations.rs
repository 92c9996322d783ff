//! Abbreviation expansion

use crate::config::Abbreviation;

/// Rewrites abbreviations to their full forms by literal replacement.
///
/// Longer abbreviations are replaced first so that `U.S.S.R.` is not consumed
/// by `U.S.`; entries of equal length keep their table order.
#[derive(Debug, Clone)]
pub struct AbbreviationExpander {
    entries: Vec<Abbreviation>,
}

impl AbbreviationExpander {
    pub fn new(table: &[Abbreviation]) -> Self {
        let mut entries = table.to_vec();
        entries.sort_by(|a, b| b.short.len().cmp(&a.short.len()));
        Self { entries }
    }

    pub fn expand(&self, text: &str) -> String {
        self.entries
            .iter()
            .fold(text.to_string(), |text, entry| {
                text.replace(&entry.short, &entry.expansion)
            })
    }
}
