//! Chunking, indexing and retrieval-augmented answering for newsrag
//!
//! This crate provides the article indexer, the in-memory and Qdrant vector
//! stores, the reranker and the RAG engine that ties them to a chat model.

mod chunker;
mod engine;
mod hashing;
mod indexer;
mod rerank;
mod vector_store;


pub use chunker::{article_id, chunk_article, chunk_text, Chunk, ChunkingConfig};
pub use engine::{NewsRAGEngine, DEFAULT_SYSTEM_PROMPT};
pub use hashing::HashingEmbedder;
pub use indexer::{ArticleIndexer, IndexingResult};
pub use rerank::{term_overlap, terms, Reranker};
pub use vector_store::{cosine_similarity, point_id, LocalVectorStore, QdrantConfig, QdrantVectorStore};

// Re-export core types for convenience
pub use newsrag_core::{
    Answer, Article, Embedder, Error, QueryConfig, RAGEngine, RAGQuery, RAGResult, Result,
    RetrievedChunk, VectorMatch, VectorRecord, VectorStore,
};
