//! Vector store trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// A vector with its id and metadata, as upserted into the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub vector: Vec<f32>,
    pub metadata: serde_json::Value,
}

/// A ranked neighbour returned by a query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorMatch {
    pub id: String,
    pub score: f32,
    pub metadata: serde_json::Value,
}

/// Configuration for a nearest-neighbour query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    pub top_k: usize,
    pub score_threshold: Option<f32>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            score_threshold: None,
        }
    }
}

/// Trait for vector databases (Qdrant, in-memory, ...)
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create the index for vectors of `dimension` if it does not exist yet
    async fn ensure_index(&self, dimension: usize) -> Result<()>;

    /// Insert or replace records by id
    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<usize>;

    /// Nearest neighbours of `vector`, best first
    async fn query(&self, vector: &[f32], config: &QueryConfig) -> Result<Vec<VectorMatch>>;

    /// Number of stored records
    async fn count(&self) -> Result<usize>;
}
