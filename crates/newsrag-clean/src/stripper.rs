//! Artifact stripping
//!
//! Joins the kept fragments and rewrites the result through a fixed sequence
//! of [`Step`]s. Later steps rely on earlier ones (the ASCII-only sentence
//! repair in [`Step::RepairSentences`] runs after [`Step::StripNonAscii`], the
//! punctuation fixes assume collapsed whitespace), so [`STEPS`] is the only
//! supported order. Each step is exposed on its own for testing.

use regex::Regex;
use std::sync::LazyLock;

use newsrag_core::{Error, Result};

use crate::config::{CleaningConfig, Replacement};

/// A rewrite applied to the joined article text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Typographic quotes to `'`
    NormalizeQuotes,
    /// Script calls and brace blocks, greedy
    RemoveScripts,
    /// Parenthesis spacing, ellipsis glyphs, serialized escapes
    CollapseArtifacts,
    CollapseWhitespace,
    /// Stray quotes/brackets, space before punctuation, dashes
    StripPunctuation,
    StripNonAscii,
    /// Repeated periods, zero-width tokens, dangling apostrophes, false sentence ends
    RepairSentences,
    /// Literal replacement table and cookie notice
    ApplyReplacements,
}

/// Order in which [`ArtifactStripper::strip`] runs the steps
pub const STEPS: [Step; 8] = [
    Step::NormalizeQuotes,
    Step::RemoveScripts,
    Step::CollapseArtifacts,
    Step::CollapseWhitespace,
    Step::StripPunctuation,
    Step::StripNonAscii,
    Step::RepairSentences,
    Step::ApplyReplacements,
];

static BRACE_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

static SERIALIZED_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\(?:xa0|n|t|r)").unwrap());

static OPEN_PAREN_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(\s+").unwrap());

static CLOSE_PAREN_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+\)").unwrap());

static EMPTY_PARENS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(\s*\)").unwrap());

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static SPACE_BEFORE_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([.,!?;:])").unwrap());

// en/em/figure dashes, horizontal bar, double hyphens, spaced hyphen
static DASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x{2012}-\x{2015}]|-{2,}|\s-\s").unwrap());

static REPEATED_PERIODS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.{2,}").unwrap());

/// Join fragments with single spaces, each trimmed
pub fn join_fragments(fragments: &[String]) -> String {
    fragments
        .iter()
        .map(|fragment| fragment.trim())
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn normalize_quotes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{201C}' | '\u{201D}'
            | '\u{201E}' | '\u{201F}' | '\u{2032}' | '\u{2033}' => '\'',
            other => other,
        })
        .collect()
}

/// Remove `{...}` from the first `{` to the last `}` in the text
pub fn remove_brace_blocks(text: &str) -> String {
    BRACE_BLOCK.replace_all(text, "").into_owned()
}

pub fn collapse_artifacts(text: &str) -> String {
    let text = SERIALIZED_ESCAPE.replace_all(text, " ");
    let text = OPEN_PAREN_SPACE.replace_all(&text, "(");
    let text = CLOSE_PAREN_SPACE.replace_all(&text, ")");
    let text = EMPTY_PARENS.replace_all(&text, "");

    text.chars()
        .filter(|c| !matches!(c, '\u{2026}' | '\u{00AB}' | '\u{00BB}'))
        .collect()
}

pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").into_owned()
}

pub fn strip_punctuation(text: &str) -> String {
    let text: String = text
        .chars()
        .filter(|c| !matches!(c, '"' | '[' | ']' | '`'))
        .collect();
    let text = SPACE_BEFORE_PUNCTUATION.replace_all(&text, "$1");
    let text = DASH.replace_all(&text, " ");
    collapse_whitespace(&text)
}

/// Drop every non-ASCII character; nothing is transliterated
pub fn strip_non_ascii(text: &str) -> String {
    text.chars().filter(char::is_ascii).collect()
}

/// Remove `'` when a space follows and it does not close a plural possessive
pub fn remove_dangling_apostrophes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    for (i, &c) in chars.iter().enumerate() {
        if c == '\'' && chars.get(i + 1) == Some(&' ') {
            let possessive = i > 0 && matches!(chars[i - 1], 's' | 'S');
            if !possessive {
                continue;
            }
        }
        out.push(c);
    }

    out
}

/// Remove a period that ends a lowercase word when a space and a lowercase
/// letter follow. Such a period cannot end a sentence; it is usually left over
/// from an abbreviation like `approx.` (and legitimate ones like `Inc.` are
/// lost too).
pub fn remove_false_periods(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    for (i, &c) in chars.iter().enumerate() {
        if c == '.'
            && i > 0
            && chars[i - 1].is_ascii_lowercase()
            && chars.get(i + 1) == Some(&' ')
            && chars.get(i + 2).is_some_and(|next| next.is_ascii_lowercase())
        {
            continue;
        }
        out.push(c);
    }

    out
}

/// Configured rewrite pipeline for joined article text
#[derive(Debug, Clone)]
pub struct ArtifactStripper {
    script_calls: Option<Regex>,
    zero_width_word: Option<Regex>,
    replacements: Vec<Replacement>,
    cookie_notice: Option<String>,
}

impl ArtifactStripper {
    /// Compile the configured patterns
    pub fn new(config: &CleaningConfig) -> Result<Self> {
        let script_calls = if config.script_calls.is_empty() {
            None
        } else {
            let names = config
                .script_calls
                .iter()
                .map(|name| regex::escape(name))
                .collect::<Vec<_>>()
                .join("|");
            Some(compile(&format!(r"(?s)(?:{})\(.*\);?", names))?)
        };

        let zero_width_word = if config.zero_width_token.is_empty() {
            None
        } else {
            Some(compile(&format!(
                r"\S*{}\S*",
                regex::escape(&config.zero_width_token)
            ))?)
        };

        Ok(Self {
            script_calls,
            zero_width_word,
            replacements: config.replacements.clone(),
            cookie_notice: config.cookie_notice.clone().filter(|n| !n.is_empty()),
        })
    }

    /// Join the fragments and run every step in [`STEPS`] order
    pub fn strip(&self, fragments: &[String]) -> String {
        STEPS
            .iter()
            .fold(join_fragments(fragments), |text, &step| self.apply(step, &text))
    }

    /// Run a single step
    pub fn apply(&self, step: Step, text: &str) -> String {
        match step {
            Step::NormalizeQuotes => normalize_quotes(text),
            Step::RemoveScripts => self.remove_scripts(text),
            Step::CollapseArtifacts => collapse_artifacts(text),
            Step::CollapseWhitespace => collapse_whitespace(text),
            Step::StripPunctuation => strip_punctuation(text),
            Step::StripNonAscii => strip_non_ascii(text),
            Step::RepairSentences => self.repair_sentences(text),
            Step::ApplyReplacements => self.apply_replacements(text),
        }
    }

    fn remove_scripts(&self, text: &str) -> String {
        let text = match &self.script_calls {
            Some(pattern) => pattern.replace_all(text, "").into_owned(),
            None => text.to_string(),
        };
        remove_brace_blocks(&text)
    }

    fn repair_sentences(&self, text: &str) -> String {
        let mut text = REPEATED_PERIODS.replace_all(text, ".").into_owned();
        if let Some(pattern) = &self.zero_width_word {
            text = pattern.replace_all(&text, "").into_owned();
        }
        let text = remove_dangling_apostrophes(&text);
        let text = remove_false_periods(&text);
        collapse_whitespace(&text)
    }

    fn apply_replacements(&self, text: &str) -> String {
        let mut text = text.to_string();
        for replacement in &self.replacements {
            text = text.replace(&replacement.from, &replacement.to);
        }
        if let Some(notice) = &self.cookie_notice {
            text = text.replace(notice.as_str(), "");
        }
        collapse_whitespace(&text).trim().to_string()
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::Configuration(format!("Invalid pattern: {}", e)))
}
