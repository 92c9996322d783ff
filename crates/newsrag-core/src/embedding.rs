//! Embedding provider trait

use async_trait::async_trait;

use crate::Result;

/// Trait for embedding models.
///
/// Implementations return one fixed-length vector per input text, in input order.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| crate::Error::Embedding("Empty embedding response".to_string()))
    }

    /// Length of the vectors this model returns
    fn dimension(&self) -> usize;

    /// Model identifier sent to the provider
    fn model_id(&self) -> &str;
}
