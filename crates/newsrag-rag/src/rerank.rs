//! Reranking of vector matches by query term overlap

use std::collections::HashSet;

use newsrag_core::RetrievedChunk;

/// Lowercase alphanumeric terms of `text`, deduplicated, in first-seen order
pub fn terms(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|term| !term.is_empty())
        .filter(|term| seen.insert(term.to_string()))
        .map(str::to_string)
        .collect()
}

/// Share of the query's terms that also occur in `content`, in `[0, 1]`
pub fn term_overlap(query: &str, content: &str) -> f32 {
    let query_terms = terms(query);
    if query_terms.is_empty() {
        return 0.0;
    }

    let content_terms: HashSet<String> = terms(content).into_iter().collect();
    let matches = query_terms
        .iter()
        .filter(|term| content_terms.contains(*term))
        .count();

    matches as f32 / query_terms.len() as f32
}

/// Blends vector similarity with lexical overlap:
/// `alpha * vector_score + (1 - alpha) * term_overlap`
#[derive(Debug, Clone, Copy)]
pub struct Reranker {
    alpha: f32,
}

impl Default for Reranker {
    fn default() -> Self {
        Self { alpha: 0.8 }
    }
}

impl Reranker {
    /// `alpha` is clamped to `[0, 1]`
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn score(&self, query: &str, chunk: &RetrievedChunk) -> f32 {
        self.alpha * chunk.vector_score + (1.0 - self.alpha) * term_overlap(query, &chunk.content)
    }

    /// Rescore every chunk and sort best first. Ties keep their vector order.
    pub fn rerank(&self, query: &str, mut chunks: Vec<RetrievedChunk>) -> Vec<RetrievedChunk> {
        for chunk in &mut chunks {
            chunk.score = self.score(query, chunk);
        }

        chunks.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &str, content: &str, vector_score: f32) -> RetrievedChunk {
        RetrievedChunk {
            id: id.to_string(),
            content: content.to_string(),
            title: String::new(),
            date: String::new(),
            url: String::new(),
            vector_score,
            score: vector_score,
        }
    }

    #[test]
    fn test_terms_are_lowercase_and_unique() {
        assert_eq!(terms("Rates, rates AND Inflation!"), vec!["rates", "and", "inflation"]);
        assert!(terms(" ... ").is_empty());
    }

    #[test]
    fn test_term_overlap() {
        assert_eq!(term_overlap("interest rates", "Rates rose."), 0.5);
        assert_eq!(term_overlap("interest rates", "Interest rates rose."), 1.0);
        assert_eq!(term_overlap("", "anything"), 0.0);
        assert_eq!(term_overlap("rates", ""), 0.0);
    }

    #[test]
    fn test_overlap_can_reorder_close_matches() {
        let chunks = vec![
            chunk("vague", "Markets were quiet on Monday.", 0.80),
            chunk("exact", "The central bank raised interest rates.", 0.78),
        ];

        let reranked = Reranker::default().rerank("interest rates", chunks);
        assert_eq!(reranked[0].id, "exact");
        assert!((reranked[0].score - (0.8 * 0.78 + 0.2)).abs() < 1e-6);
        assert!((reranked[1].score - 0.8 * 0.80).abs() < 1e-6);
    }

    #[test]
    fn test_alpha_one_keeps_vector_scores() {
        let reranker = Reranker::new(1.5);
        assert_eq!(reranker.alpha(), 1.0);

        let reranked = reranker.rerank("rates", vec![chunk("a", "rates", 0.3), chunk("b", "none", 0.6)]);
        assert_eq!(reranked[0].id, "b");
        assert_eq!(reranked[0].score, 0.6);
    }
}
