//! Answer quality metrics
//!
//! - BLEU: clipped n-gram precision up to 4-grams with brevity penalty
//! - ROUGE-L: longest common subsequence F-measure
//! - Cosine similarity between answer and reference embeddings

use std::collections::HashMap;

/// Highest n-gram order used by [`bleu`]
pub const BLEU_MAX_ORDER: usize = 4;

/// Numerator used for an n-gram order without any match
pub const BLEU_EPSILON: f64 = 0.1;

/// Lowercase word tokens; punctuation separates words and is dropped
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(|token| token.to_string())
        .collect()
}

fn ngram_counts(tokens: &[String], n: usize) -> HashMap<&[String], usize> {
    let mut counts = HashMap::new();
    for gram in tokens.windows(n) {
        *counts.entry(gram).or_insert(0) += 1;
    }
    counts
}

/// Clipped n-gram precision as (matches, candidate n-grams)
fn modified_precision(candidate: &[String], reference: &[String], n: usize) -> (usize, usize) {
    let candidate_counts = ngram_counts(candidate, n);
    let reference_counts = ngram_counts(reference, n);

    let matches = candidate_counts
        .iter()
        .map(|(gram, count)| (*count).min(reference_counts.get(gram).copied().unwrap_or(0)))
        .sum();
    let total = candidate.len().saturating_sub(n - 1);

    (matches, total)
}

/// Sentence-level BLEU of `candidate` against one `reference`.
///
/// Uniform weights over 1- to 4-gram precisions. An order with no match
/// contributes `BLEU_EPSILON / max(1, total)` instead of zero. The brevity
/// penalty is `exp(1 - r/c)` when the candidate is shorter than the
/// reference. An empty candidate scores 0.
pub fn bleu(candidate: &str, reference: &str) -> f64 {
    let candidate = tokenize(candidate);
    let reference = tokenize(reference);

    if candidate.is_empty() || reference.is_empty() {
        return 0.0;
    }

    let log_precision_sum: f64 = (1..=BLEU_MAX_ORDER)
        .map(|n| {
            let (matches, total) = modified_precision(&candidate, &reference, n);
            let numerator = if matches == 0 {
                BLEU_EPSILON
            } else {
                matches as f64
            };
            (numerator / total.max(1) as f64).ln()
        })
        .sum();

    let c = candidate.len() as f64;
    let r = reference.len() as f64;
    let brevity_penalty = if c > r { 1.0 } else { (1.0 - r / c).exp() };

    brevity_penalty * (log_precision_sum / BLEU_MAX_ORDER as f64).exp()
}

/// Longest common subsequence length
fn lcs_length(a: &[String], b: &[String]) -> usize {
    let m = a.len();
    let n = b.len();

    if m == 0 || n == 0 {
        return 0;
    }

    let mut dp = vec![vec![0; n + 1]; m + 1];

    for i in 1..=m {
        for j in 1..=n {
            if a[i - 1] == b[j - 1] {
                dp[i][j] = dp[i - 1][j - 1] + 1;
            } else {
                dp[i][j] = dp[i - 1][j].max(dp[i][j - 1]);
            }
        }
    }

    dp[m][n]
}

/// ROUGE-L F-measure (beta 1) over lowercase word tokens.
///
/// Zero when either side has no tokens.
pub fn rouge_l(candidate: &str, reference: &str) -> f64 {
    let candidate = tokenize(candidate);
    let reference = tokenize(reference);

    if candidate.is_empty() || reference.is_empty() {
        return 0.0;
    }

    let lcs = lcs_length(&candidate, &reference) as f64;
    let precision = lcs / candidate.len() as f64;
    let recall = lcs / reference.len() as f64;

    if precision + recall == 0.0 {
        return 0.0;
    }

    2.0 * (precision * recall) / (precision + recall)
}

/// Cosine similarity of two embeddings; 0 for mismatched lengths or zero norm
pub fn embedding_cosine(a: &[f32], b: &[f32]) -> f64 {
    newsrag_rag::cosine_similarity(a, b) as f64
}

/// Mean of `scores`, 0 when empty
pub fn mean(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}
