//! Retrieval-augmented answering trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Question to answer from the indexed corpus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RAGQuery {
    pub question: String,
    pub top_k: usize,
    pub score_threshold: Option<f32>,
}

impl RAGQuery {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Default::default()
        }
    }
}

impl Default for RAGQuery {
    fn default() -> Self {
        Self {
            question: String::new(),
            top_k: 5,
            score_threshold: None,
        }
    }
}

/// A chunk returned by retrieval, after reranking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub id: String,
    pub content: String,
    pub title: String,
    pub date: String,
    pub url: String,
    pub vector_score: f32,
    pub score: f32,
}

/// Result of retrieval for one query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RAGResult {
    pub chunks: Vec<RetrievedChunk>,
    pub context: String,
}

/// A generated answer with the chunks it was grounded on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub question: String,
    pub text: String,
    pub chunks: Vec<RetrievedChunk>,
    pub model_id: String,
}

/// Trait for RAG engines
///
/// Retrieves the chunks relevant to a question and asks a chat model to
/// answer from them.
#[async_trait]
pub trait RAGEngine: Send + Sync {
    /// Retrieve and rank chunks for a query
    async fn retrieve(&self, query: &RAGQuery) -> Result<RAGResult>;

    /// Build the numbered context block handed to the chat model
    fn build_context(&self, chunks: &[RetrievedChunk]) -> String;

    /// Retrieve, then generate an answer grounded on the retrieved chunks
    async fn answer(&self, query: &RAGQuery) -> Result<Answer>;
}
