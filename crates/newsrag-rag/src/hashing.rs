//! Offline feature-hashing embedder

use async_trait::async_trait;

use newsrag_core::{Embedder, Error, Result};

/// Deterministic bag-of-words embedder.
///
/// Words and adjacent word pairs are hashed into a fixed number of buckets
/// and the vector is L2-normalised, so texts sharing vocabulary score a high
/// cosine similarity. Needs no network access; used for offline runs and tests.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
    model_id: String,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(Error::Configuration(
                "Embedding dimension must be positive".to_string(),
            ));
        }

        Ok(Self {
            dimension,
            model_id: format!("hashing-{}", dimension),
        })
    }

    fn bucket(&self, feature: &str) -> usize {
        let digest = md5::compute(feature.as_bytes());
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest.0[..8]);
        (u64::from_le_bytes(bytes) % self.dimension as u64) as usize
    }

    /// Embed a single text without going through the async trait
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let normalized: String = text
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { ' ' })
            .collect();
        let words: Vec<&str> = normalized.split_whitespace().collect();
        let mut vector = vec![0.0f32; self.dimension];

        for word in &words {
            vector[self.bucket(word)] += 1.0;
        }

        for pair in words.windows(2) {
            vector[self.bucket(&format!("{} {}", pair[0], pair[1]))] += 0.5;
        }

        let magnitude: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut vector {
                *value /= magnitude;
            }
        }

        vector
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::cosine_similarity;

    #[test]
    fn test_same_text_same_vector() {
        let embedder = HashingEmbedder::new(64).unwrap();
        let a = embedder.embed_text("Central bank raises rates");
        let b = embedder.embed_text("central bank, raises rates!");

        assert_eq!(a, b);
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_shared_vocabulary_scores_higher() {
        let embedder = HashingEmbedder::new(256).unwrap();
        let query = embedder.embed_text("interest rates inflation");
        let close = embedder.embed_text("The central bank raised interest rates to fight inflation");
        let far = embedder.embed_text("The football team won the championship final");

        assert!(cosine_similarity(&query, &close) > cosine_similarity(&query, &far));
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let embedder = HashingEmbedder::new(8).unwrap();
        assert_eq!(embedder.embed_text("  ...  "), vec![0.0; 8]);
    }

    #[test]
    fn test_zero_dimension_is_rejected() {
        assert!(matches!(HashingEmbedder::new(0), Err(Error::Configuration(_))));
    }
}
