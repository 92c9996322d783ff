//! Normalization pipeline and corpus driver

use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info, warn};

use newsrag_core::{Article, Error, RawArticle, Result};

use crate::abbreviations::AbbreviationExpander;
use crate::config::CleaningConfig;
use crate::segmenter::segment_checked;
use crate::stripper::ArtifactStripper;
use crate::truncator::truncate;

/// Normalized content of one article
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub text: String,
    pub truncated: bool,
}

/// Segment, truncate, strip and expand article content
#[derive(Debug, Clone)]
pub struct Normalizer {
    config: CleaningConfig,
    stripper: ArtifactStripper,
    expander: AbbreviationExpander,
}

impl Normalizer {
    pub fn new(config: CleaningConfig) -> Result<Self> {
        config.validate()?;
        let stripper = ArtifactStripper::new(&config)?;
        let expander = AbbreviationExpander::new(&config.abbreviations);

        Ok(Self {
            config,
            stripper,
            expander,
        })
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Normalize raw serialized-list content.
    ///
    /// Fails with [`Error::MalformedContent`] when the content is not a
    /// bracket-delimited list; nothing else can fail.
    pub fn normalize(&self, raw: &str) -> Result<Normalized> {
        let fragments = segment_checked(raw)?;
        Ok(self.normalize_fragments(&fragments))
    }

    /// Run truncation, stripping and expansion over already segmented fragments
    pub fn normalize_fragments(&self, fragments: &[String]) -> Normalized {
        let truncation = truncate(fragments, &self.config);
        let stripped = self.stripper.strip(truncation.kept);

        Normalized {
            text: self.expander.expand(&stripped),
            truncated: truncation.is_truncated(),
        }
    }
}

/// Counters for one corpus run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleaningReport {
    pub articles_read: usize,
    pub articles_cleaned: usize,
    /// Articles whose content was malformed and written unmodified
    pub passed_through: usize,
    /// Rows that could not be parsed and were left out of the output
    pub rows_skipped: usize,
    /// Cleaned articles that lost a preamble or trailing boilerplate
    pub truncated: usize,
}

/// How a single article was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleOutcome {
    Cleaned { truncated: bool },
    PassedThrough,
}

/// Applies a [`Normalizer`] to every article of a corpus file
pub struct CorpusCleaner {
    normalizer: Normalizer,
}

impl CorpusCleaner {
    pub fn new(normalizer: Normalizer) -> Self {
        Self { normalizer }
    }

    /// Clean one article. Malformed content is kept as-is and logged.
    pub fn clean_article(&self, raw: RawArticle) -> (Article, ArticleOutcome) {
        let mut article = Article::from(raw);

        match self.normalizer.normalize(&article.content) {
            Ok(normalized) => {
                article.content = normalized.text;
                let outcome = ArticleOutcome::Cleaned {
                    truncated: normalized.truncated,
                };
                (article, outcome)
            }
            Err(e) => {
                warn!(url = %article.url, error = %e, "Passing content through unmodified");
                (article, ArticleOutcome::PassedThrough)
            }
        }
    }

    /// Stream raw CSV rows from `reader` to processed rows on `writer`
    pub fn clean_csv<R: Read, W: Write>(&self, reader: R, writer: W) -> Result<CleaningReport> {
        let mut reader = csv::Reader::from_reader(reader);
        let mut writer = csv::Writer::from_writer(writer);
        let mut report = CleaningReport::default();

        for (row, record) in reader.deserialize::<RawArticle>().enumerate() {
            let raw = match record {
                Ok(raw) => raw,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    warn!(row = row + 1, error = %e, "Skipping unreadable row");
                    report.rows_skipped += 1;
                    continue;
                }
            };

            report.articles_read += 1;
            let (article, outcome) = self.clean_article(raw);
            match outcome {
                ArticleOutcome::Cleaned { truncated } => {
                    report.articles_cleaned += 1;
                    if truncated {
                        report.truncated += 1;
                    }
                }
                ArticleOutcome::PassedThrough => report.passed_through += 1,
            }

            debug!(title = %article.title, chars = article.content.len(), "Cleaned article");
            writer.serialize(&article)?;
        }

        writer.flush()?;
        Ok(report)
    }

    /// Clean `input` into a new file at `output`. The input file is never modified.
    pub fn clean_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<CleaningReport> {
        let input = input.as_ref();
        let output = output.as_ref();

        if same_file(input, output) {
            return Err(Error::InvalidInput(format!(
                "Output {} would overwrite the raw corpus",
                output.display()
            )));
        }

        let source = File::open(input).map_err(|e| {
            Error::InvalidInput(format!("Failed to open {}: {}", input.display(), e))
        })?;
        let target = File::create(output)?;

        let report = self.clean_csv(source, target)?;
        info!(
            input = %input.display(),
            output = %output.display(),
            read = report.articles_read,
            cleaned = report.articles_cleaned,
            passed_through = report.passed_through,
            skipped = report.rows_skipped,
            "Corpus cleaned"
        );

        Ok(report)
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> Normalizer {
        Normalizer::new(CleaningConfig::default()).unwrap()
    }

    #[test]
    fn test_stop_phrase_scenario() {
        let raw = "['Hello world. This is a test.', 'Thank you for subscribing to the email newsletter.', 'ignored tail']";
        let normalized = normalizer().normalize(raw).unwrap();

        assert_eq!(normalized.text, "Hello world. This is a test.");
        assert!(normalized.truncated);
    }

    #[test]
    fn test_abbreviation_scenario_keeps_double_space() {
        let normalized = normalizer().normalize("['U.S. and U.K. leaders met']").unwrap();
        assert!(normalized.text.contains("United States  and United Kingdom leaders met"));
    }

    #[test]
    fn test_non_ascii_scenario() {
        let normalized = normalizer().normalize("['café']").unwrap();
        assert_eq!(normalized.text, "caf");
    }

    #[test]
    fn test_malformed_content_is_an_error() {
        let result = normalizer().normalize("no list here");
        assert!(matches!(result, Err(Error::MalformedContent(_))));
    }

    #[test]
    fn test_empty_list_normalizes_to_empty_text() {
        let normalized = normalizer().normalize("[]").unwrap();
        assert_eq!(normalized.text, "");
        assert!(!normalized.truncated);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = CleaningConfig {
            stop_phrases: vec![String::new()],
            ..CleaningConfig::default()
        };
        assert!(Normalizer::new(config).is_err());
    }

    #[test]
    fn test_clean_article_passes_malformed_content_through() {
        let cleaner = CorpusCleaner::new(normalizer());
        let raw = RawArticle {
            title: "Plain".to_string(),
            date: "2023-01-01".to_string(),
            author: None,
            content: "Plain text body \u{2014} not a list".to_string(),
            domain: "example.com".to_string(),
            url: "https://example.com/plain".to_string(),
        };

        let (article, outcome) = cleaner.clean_article(raw);
        assert_eq!(outcome, ArticleOutcome::PassedThrough);
        assert_eq!(article.content, "Plain text body \u{2014} not a list");
    }

    #[test]
    fn test_refuses_to_overwrite_input() {
        let cleaner = CorpusCleaner::new(normalizer());
        let result = cleaner.clean_file("raw.csv", "raw.csv");
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
