//! Article indexer: chunk, embed in batches, upsert

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use newsrag_core::{Article, Embedder, Error, Result, VectorRecord, VectorStore};

use crate::chunker::{chunk_article, ChunkingConfig};

/// Counters for one indexing run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexingResult {
    pub articles_indexed: usize,
    pub chunks_indexed: usize,
    pub articles_failed: usize,
    pub errors: Vec<String>,
}

/// Indexes articles into any [`VectorStore`] with any [`Embedder`]
pub struct ArticleIndexer<E: Embedder, V: VectorStore> {
    embedder: Arc<E>,
    vector_store: Arc<V>,
    config: ChunkingConfig,
}

impl<E: Embedder, V: VectorStore> ArticleIndexer<E, V> {
    pub fn new(embedder: Arc<E>, vector_store: Arc<V>) -> Self {
        Self {
            embedder,
            vector_store,
            config: ChunkingConfig::default(),
        }
    }

    /// Create with custom chunking; rejects an invalid config
    pub fn with_config(embedder: Arc<E>, vector_store: Arc<V>, config: ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            embedder,
            vector_store,
            config,
        })
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Create the vector index sized for the embedder
    pub async fn ensure_index(&self) -> Result<()> {
        self.vector_store.ensure_index(self.embedder.dimension()).await
    }

    /// Index one article and return the number of chunks stored.
    ///
    /// Expects the index to exist; see [`ArticleIndexer::ensure_index`].
    pub async fn index_article(&self, article: &Article) -> Result<usize> {
        let chunks = chunk_article(article, &self.config)?;
        let mut stored = 0;

        for batch in chunks.chunks(self.config.batch_size) {
            let texts: Vec<String> = batch.iter().map(|chunk| chunk.content.clone()).collect();
            let vectors = self.embedder.embed_batch(&texts).await?;

            if vectors.len() != batch.len() {
                return Err(Error::Embedding(format!(
                    "Expected {} embeddings, received {}",
                    batch.len(),
                    vectors.len()
                )));
            }

            let records = batch
                .iter()
                .zip(vectors)
                .map(|(chunk, vector)| VectorRecord {
                    id: chunk.id.clone(),
                    vector,
                    metadata: chunk.metadata.clone(),
                })
                .collect();

            stored += self.vector_store.upsert(records).await?;
        }

        debug!(title = %article.title, chunks = stored, "Indexed article");
        Ok(stored)
    }

    /// Index every article. A failing article is recorded and skipped.
    pub async fn index_articles(&self, articles: &[Article]) -> Result<IndexingResult> {
        self.ensure_index().await?;

        let mut result = IndexingResult::default();
        for article in articles {
            match self.index_article(article).await {
                Ok(chunks) => {
                    result.articles_indexed += 1;
                    result.chunks_indexed += chunks;
                }
                Err(e) => {
                    warn!(url = %article.url, error = %e, "Failed to index article");
                    result.articles_failed += 1;
                    result.errors.push(format!("Failed to index {}: {}", article.url, e));
                }
            }
        }

        info!(
            articles = result.articles_indexed,
            chunks = result.chunks_indexed,
            failed = result.articles_failed,
            "Indexing finished"
        );

        Ok(result)
    }
}
