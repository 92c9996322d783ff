//! Vector store selected at runtime

use async_trait::async_trait;

use newsrag_core::{QueryConfig, Result, VectorMatch, VectorRecord, VectorStore};
use newsrag_rag::{LocalVectorStore, QdrantConfig, QdrantVectorStore};

/// Qdrant when configured, otherwise an in-memory store
pub enum AnyVectorStore {
    Memory(LocalVectorStore),
    Qdrant(QdrantVectorStore),
}

impl AnyVectorStore {
    pub fn open(config: Option<&QdrantConfig>) -> Result<Self> {
        match config {
            Some(config) => Ok(Self::Qdrant(QdrantVectorStore::new(config)?)),
            None => Ok(Self::Memory(LocalVectorStore::new())),
        }
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self, Self::Qdrant(_))
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Memory(_) => "in-memory store".to_string(),
            Self::Qdrant(store) => format!("Qdrant collection '{}'", store.collection()),
        }
    }
}

#[async_trait]
impl VectorStore for AnyVectorStore {
    async fn ensure_index(&self, dimension: usize) -> Result<()> {
        match self {
            Self::Memory(store) => store.ensure_index(dimension).await,
            Self::Qdrant(store) => store.ensure_index(dimension).await,
        }
    }

    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<usize> {
        match self {
            Self::Memory(store) => store.upsert(records).await,
            Self::Qdrant(store) => store.upsert(records).await,
        }
    }

    async fn query(&self, vector: &[f32], config: &QueryConfig) -> Result<Vec<VectorMatch>> {
        match self {
            Self::Memory(store) => store.query(vector, config).await,
            Self::Qdrant(store) => store.query(vector, config).await,
        }
    }

    async fn count(&self) -> Result<usize> {
        match self {
            Self::Memory(store) => store.count().await,
            Self::Qdrant(store) => store.count().await,
        }
    }
}
