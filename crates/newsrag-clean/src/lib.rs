//! Text normalization for scraped news article bodies
//!
//! Raw bodies are serialized lists of paragraphs polluted with site banners,
//! newsletter prompts, ad scripts and typographic noise. The [`Normalizer`]
//! turns one body into plain ASCII prose:
//!
//! 1. [`segmenter`] cuts the list into sentence-like fragments,
//! 2. [`truncator`] drops a known site preamble and everything after the first
//!    boilerplate fragment,
//! 3. [`stripper`] joins what is left and rewrites it through ordered steps,
//! 4. [`abbreviations`] expands a fixed set of country/organisation abbreviations.
//!
//! [`CorpusCleaner`] applies the normalizer to every row of a corpus CSV.

pub mod abbreviations;
pub mod config;
pub mod pipeline;
pub mod segmenter;
pub mod stripper;
pub mod truncator;

#[cfg(test)]
mod tests;

pub use abbreviations::AbbreviationExpander;
pub use config::{Abbreviation, CleaningConfig, PrefixRule, Replacement};
pub use pipeline::{ArticleOutcome, CleaningReport, CorpusCleaner, Normalized, Normalizer};
pub use segmenter::{segment, segment_checked};
pub use stripper::{ArtifactStripper, STEPS, Step};
pub use truncator::{Truncation, truncate};

// Re-export core types for convenience
pub use newsrag_core::{Article, Error, RawArticle, Result};
