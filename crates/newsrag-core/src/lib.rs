//! Core traits and types for newsrag
//!
//! This crate defines the article model, the error type and the capability-facing
//! interfaces for the hosted collaborators (chat model, embedding model, vector
//! database) so every stage of the pipeline can be tested against local doubles.

pub mod article;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod rag;
pub mod vector_store;

#[cfg(test)]
mod tests;

pub use article::{Article, RawArticle, read_articles};
pub use embedding::Embedder;
pub use error::{Error, Result};
pub use llm::{ChatConfig, ChatMessage, ChatProvider, ChatResult, Role};
pub use rag::{Answer, RAGEngine, RAGQuery, RAGResult, RetrievedChunk};
pub use vector_store::{QueryConfig, VectorMatch, VectorRecord, VectorStore};
