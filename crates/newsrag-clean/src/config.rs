//! Cleaning tables
//!
//! Every table the normalizer consults lives here and is passed in explicitly,
//! so a deployment can swap any of them through a TOML file:
//!
//! ```toml
//! stop_phrases = ["Thank you for subscribing", "Sign up for our newsletter"]
//!
//! [prefix_rule]
//! marker = "Skip to main content"
//! drop_count = 11
//!
//! [[abbreviations]]
//! short = "U.S."
//! expansion = "United States "
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use newsrag_core::{Error, Result};

/// Drops a source site's fixed preamble.
///
/// Applies only when fragment zero contains `marker`. With `resume_after` set,
/// everything up to and including the first fragment containing it is dropped;
/// otherwise (or when the pattern never shows up) `drop_count` fragments are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefixRule {
    pub marker: String,
    pub drop_count: usize,
    #[serde(default)]
    pub resume_after: Option<String>,
}

/// A literal substring replacement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Replacement {
    pub from: String,
    pub to: String,
}

/// An abbreviation and its full form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Abbreviation {
    pub short: String,
    pub expansion: String,
}

/// Configuration for article normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Substrings marking the start of boilerplate, checked in order
    pub stop_phrases: Vec<String>,
    pub prefix_rule: Option<PrefixRule>,
    /// Names of ad/tracking script calls removed together with their arguments
    pub script_calls: Vec<String>,
    /// Serialized zero-width-space escape; any word containing it is dropped
    pub zero_width_token: String,
    pub replacements: Vec<Replacement>,
    /// Cookie-consent sentence removed verbatim
    pub cookie_notice: Option<String>,
    pub abbreviations: Vec<Abbreviation>,
}

fn replacement(from: &str, to: &str) -> Replacement {
    Replacement {
        from: from.to_string(),
        to: to.to_string(),
    }
}

fn abbreviation(short: &str, expansion: &str) -> Abbreviation {
    Abbreviation {
        short: short.to_string(),
        expansion: expansion.to_string(),
    }
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            stop_phrases: [
                "Thank you for subscribing",
                "Sign up for our newsletter",
                "Subscribe to our newsletter",
                "Click here to subscribe",
                "We use cookies",
                "This article was originally published",
                "Follow us on Twitter",
                "All rights reserved",
                "Read more:",
            ]
            .iter()
            .map(|p| p.to_string())
            .collect(),
            prefix_rule: Some(PrefixRule {
                marker: "Skip to main content".to_string(),
                drop_count: 11,
                resume_after: None,
            }),
            script_calls: vec!["googletag.cmd.push".to_string()],
            zero_width_token: "\x5Cu200b".to_string(),
            replacements: vec![
                replacement(" 's ", "'s "),
                replacement(" n't ", "n't "),
                replacement("&amp;", "&"),
                replacement("AT & T", "AT&T"),
                replacement("S & P", "S&P"),
                replacement("Yahoo !", "Yahoo!"),
            ],
            cookie_notice: Some(
                "By continuing to use this site, you agree to our use of cookies.".to_string(),
            ),
            abbreviations: vec![
                abbreviation("U.S.", "United States "),
                abbreviation("U.K.", "United Kingdom"),
                abbreviation("E.U.", "European Union"),
                abbreviation("U.A.E.", "United Arab Emirates"),
                abbreviation("U.N.", "United Nations"),
                abbreviation("U.S.S.R.", "Soviet Union"),
            ],
        }
    }
}

impl CleaningConfig {
    /// Parse a TOML table set; omitted tables keep their defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)
            .map_err(|e| Error::Configuration(format!("Invalid cleaning tables: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load tables from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = std::fs::read_to_string(&path).map_err(|e| {
            Error::Configuration(format!(
                "Failed to read cleaning tables {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&source)
    }

    /// Reject tables that would silently wipe or garble every article
    pub fn validate(&self) -> Result<()> {
        if self.stop_phrases.iter().any(|p| p.is_empty()) {
            return Err(Error::Configuration(
                "Stop phrases must not be empty".to_string(),
            ));
        }

        if let Some(rule) = &self.prefix_rule {
            if rule.marker.is_empty() {
                return Err(Error::Configuration(
                    "Prefix rule marker must not be empty".to_string(),
                ));
            }
            if rule.resume_after.as_deref() == Some("") {
                return Err(Error::Configuration(
                    "Prefix rule resume_after must not be empty".to_string(),
                ));
            }
        }

        if self.script_calls.iter().any(|c| c.is_empty()) {
            return Err(Error::Configuration(
                "Script call names must not be empty".to_string(),
            ));
        }

        if self.replacements.iter().any(|r| r.from.is_empty()) {
            return Err(Error::Configuration(
                "Replacement sources must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for entry in &self.abbreviations {
            if entry.short.is_empty() {
                return Err(Error::Configuration(
                    "Abbreviations must not be empty".to_string(),
                ));
            }
            if !seen.insert(entry.short.as_str()) {
                return Err(Error::Configuration(format!(
                    "Duplicate abbreviation: {}",
                    entry.short
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables_are_valid() {
        let config = CleaningConfig::default();
        config.validate().unwrap();
        assert_eq!(config.abbreviations.len(), 6);
        assert_eq!(config.abbreviations[0].expansion, "United States ");
        assert_eq!(config.prefix_rule.as_ref().unwrap().drop_count, 11);
        assert_eq!(config.zero_width_token.len(), 6);
        assert!(config.zero_width_token.starts_with('\\'));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CleaningConfig::from_toml_str(
            r#"
            stop_phrases = ["Related coverage"]

            [prefix_rule]
            marker = "Example Gazette"
            drop_count = 3
            resume_after = "Share this story"
            "#,
        )
        .unwrap();

        assert_eq!(config.stop_phrases, vec!["Related coverage".to_string()]);
        let rule = config.prefix_rule.unwrap();
        assert_eq!(rule.drop_count, 3);
        assert_eq!(rule.resume_after.as_deref(), Some("Share this story"));
        assert_eq!(config.abbreviations, CleaningConfig::default().abbreviations);
    }

    #[test]
    fn test_duplicate_abbreviation_is_rejected() {
        let result = CleaningConfig::from_toml_str(
            r#"
            [[abbreviations]]
            short = "U.N."
            expansion = "United Nations"

            [[abbreviations]]
            short = "U.N."
            expansion = "UN"
            "#,
        );

        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_empty_stop_phrase_is_rejected() {
        let result = CleaningConfig::from_toml_str(r#"stop_phrases = ["ok", ""]"#);
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_unknown_toml_is_reported() {
        let result = CleaningConfig::from_toml_str("stop_phrases = 3");
        assert!(matches!(result, Err(Error::Configuration(_))));
    }
}
