//! RAG engine implementation

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use newsrag_core::{
    Answer, ChatConfig, ChatMessage, ChatProvider, Embedder, QueryConfig, RAGEngine, RAGQuery,
    RAGResult, Result, RetrievedChunk, VectorMatch, VectorStore,
};

use crate::rerank::Reranker;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a news analyst. Answer the question using only \
the numbered news excerpts provided. If the excerpts do not contain the answer, say that you do \
not know. Keep the answer short.";

/// RAG engine over news chunks, generic over its three collaborators
pub struct NewsRAGEngine<E: Embedder, V: VectorStore, C: ChatProvider> {
    embedder: Arc<E>,
    vector_store: Arc<V>,
    chat: Arc<C>,
    chat_config: ChatConfig,
    reranker: Reranker,
    system_prompt: String,
}

impl<E: Embedder, V: VectorStore, C: ChatProvider> NewsRAGEngine<E, V, C> {
    /// Create an engine using the chat provider's default model
    pub fn new(embedder: Arc<E>, vector_store: Arc<V>, chat: Arc<C>) -> Self {
        let chat_config = ChatConfig {
            model_id: chat.model_id().to_string(),
            ..ChatConfig::default()
        };

        Self {
            embedder,
            vector_store,
            chat,
            chat_config,
            reranker: Reranker::default(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }

    pub fn with_chat_config(mut self, chat_config: ChatConfig) -> Self {
        self.chat_config = chat_config;
        self
    }

    pub fn with_reranker(mut self, reranker: Reranker) -> Self {
        self.reranker = reranker;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn chat_config(&self) -> &ChatConfig {
        &self.chat_config
    }

    /// System prompt, then the context block followed by the question
    pub fn build_messages(&self, question: &str, context: &str) -> Vec<ChatMessage> {
        let user = if context.is_empty() {
            format!("No news excerpts were found.\n\nQuestion: {}", question)
        } else {
            format!("News excerpts:\n\n{}\nQuestion: {}", context, question)
        };

        vec![ChatMessage::system(self.system_prompt.clone()), ChatMessage::user(user)]
    }
}

fn metadata_str(metadata: &serde_json::Value, key: &str) -> String {
    metadata
        .get(key)
        .and_then(|value| value.as_str())
        .unwrap_or_default()
        .to_string()
}

fn to_retrieved(matched: VectorMatch) -> RetrievedChunk {
    RetrievedChunk {
        content: metadata_str(&matched.metadata, "content"),
        title: metadata_str(&matched.metadata, "title"),
        date: metadata_str(&matched.metadata, "date"),
        url: metadata_str(&matched.metadata, "url"),
        vector_score: matched.score,
        score: matched.score,
        id: matched.id,
    }
}

#[async_trait]
impl<E, V, C> RAGEngine for NewsRAGEngine<E, V, C>
where
    E: Embedder + 'static,
    V: VectorStore + 'static,
    C: ChatProvider + 'static,
{
    async fn retrieve(&self, query: &RAGQuery) -> Result<RAGResult> {
        let vector = self.embedder.embed(&query.question).await?;
        let config = QueryConfig {
            top_k: query.top_k,
            score_threshold: query.score_threshold,
        };

        let matches = self.vector_store.query(&vector, &config).await?;
        debug!(question = %query.question, matches = matches.len(), "Retrieved chunks");

        let chunks = matches.into_iter().map(to_retrieved).collect();
        let chunks = self.reranker.rerank(&query.question, chunks);
        let context = self.build_context(&chunks);

        Ok(RAGResult { chunks, context })
    }

    fn build_context(&self, chunks: &[RetrievedChunk]) -> String {
        let mut context = String::new();

        for (i, chunk) in chunks.iter().enumerate() {
            context.push_str(&format!("{}. ", i + 1));
            if !chunk.title.is_empty() {
                context.push_str(&format!("[{}] ", chunk.title));
            }
            if !chunk.date.is_empty() {
                context.push_str(&format!("({}) ", chunk.date));
            }
            context.push_str(&chunk.content);
            context.push_str("\n\n");
        }

        context
    }

    async fn answer(&self, query: &RAGQuery) -> Result<Answer> {
        let retrieved = self.retrieve(query).await?;
        let messages = self.build_messages(&query.question, &retrieved.context);

        let result = self.chat.complete(&messages, &self.chat_config).await?;
        info!(
            model = %result.model_id,
            chunks = retrieved.chunks.len(),
            tokens = ?result.tokens_used,
            "Generated answer"
        );

        Ok(Answer {
            question: query.question.clone(),
            text: result.text,
            chunks: retrieved.chunks,
            model_id: result.model_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::HashingEmbedder;
    use crate::vector_store::LocalVectorStore;
    use newsrag_core::{ChatResult, Role};

    struct EchoChat;

    #[async_trait]
    impl ChatProvider for EchoChat {
        async fn complete(&self, messages: &[ChatMessage], config: &ChatConfig) -> Result<ChatResult> {
            Ok(ChatResult {
                text: format!("{} messages", messages.len()),
                model_id: config.model_id.clone(),
                tokens_used: None,
            })
        }

        fn model_id(&self) -> &str {
            "echo"
        }
    }

    fn engine() -> NewsRAGEngine<HashingEmbedder, LocalVectorStore, EchoChat> {
        NewsRAGEngine::new(
            Arc::new(HashingEmbedder::new(16).unwrap()),
            Arc::new(LocalVectorStore::new()),
            Arc::new(EchoChat),
        )
    }

    fn chunk(title: &str, date: &str, content: &str) -> RetrievedChunk {
        RetrievedChunk {
            id: title.to_string(),
            content: content.to_string(),
            title: title.to_string(),
            date: date.to_string(),
            url: String::new(),
            vector_score: 0.0,
            score: 0.0,
        }
    }

    #[test]
    fn test_context_is_numbered() {
        let context = engine().build_context(&[
            chunk("Rates", "2023-03-01", "The bank raised rates."),
            chunk("", "", "Untitled excerpt."),
        ]);

        assert_eq!(
            context,
            "1. [Rates] (2023-03-01) The bank raised rates.\n\n2. Untitled excerpt.\n\n"
        );
    }

    #[test]
    fn test_messages_carry_context_and_question() {
        let engine = engine().with_system_prompt("Be brief.");
        let messages = engine.build_messages("Who won?", "1. [Final] Team A won.\n\n");

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, "Be brief.");
        assert_eq!(messages[1].role, Role::User);
        assert!(messages[1].content.contains("1. [Final] Team A won."));
        assert!(messages[1].content.ends_with("Question: Who won?"));
    }

    #[test]
    fn test_default_model_comes_from_provider() {
        assert_eq!(engine().chat_config().model_id, "echo");
    }

    #[tokio::test]
    async fn test_answer_on_empty_store() {
        let engine = engine();
        engine.vector_store.ensure_index(16).await.unwrap();

        let answer = engine.answer(&RAGQuery::new("Anything?")).await.unwrap();
        assert!(answer.chunks.is_empty());
        assert_eq!(answer.text, "2 messages");
        assert_eq!(answer.model_id, "echo");
    }
}
