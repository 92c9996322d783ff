//! OpenAI-compatible client implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::debug;

use newsrag_core::{ChatConfig, ChatMessage, ChatProvider, ChatResult, Embedder, Error, Result};

use crate::config::OpenAIConfig;

/// Client for the chat-completion and embedding endpoints
pub struct OpenAIClient {
    config: OpenAIConfig,
    client: Client,
}

#[derive(Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<Usage>,
}

#[derive(Serialize)]
pub(crate) struct EmbeddingRequest<'a> {
    pub model: &'a str,
    pub input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

/// Extract the first choice of a chat-completion response body
pub(crate) fn parse_chat_response(body: &str, model_id: &str) -> Result<ChatResult> {
    let response: ChatResponse = serde_json::from_str(body)?;

    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or_else(|| {
            Error::ChatProvider(format!("Empty response from chat API. Raw response: {}", body))
        })?;

    Ok(ChatResult {
        text,
        model_id: model_id.to_string(),
        tokens_used: response.usage.map(|usage| usage.total_tokens),
    })
}

/// Order embedding vectors by their input index and check the count
pub(crate) fn parse_embedding_response(body: &str, expected: usize) -> Result<Vec<Vec<f32>>> {
    let mut response: EmbeddingResponse = serde_json::from_str(body)?;

    if response.data.len() != expected {
        return Err(Error::Embedding(format!(
            "Expected {} embeddings, received {}",
            expected,
            response.data.len()
        )));
    }

    response.data.sort_by_key(|item| item.index);
    Ok(response.data.into_iter().map(|item| item.embedding).collect())
}

impl OpenAIClient {
    /// Create a new client from configuration
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Create a new client from environment variables
    pub fn from_env() -> Result<Self> {
        let config = OpenAIConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    /// POST a JSON body and return the response text, mapping HTTP failures
    async fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<String> {
        let url = format!("{}/{}", self.config.base_url, path);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication(format!(
                "API key rejected by {}",
                self.config.base_url
            )));
        }

        if !status.is_success() {
            return Err(Error::Network(format!(
                "Request to {} failed with status {}: {}",
                path, status, text
            )));
        }

        Ok(text)
    }
}

#[async_trait]
impl ChatProvider for OpenAIClient {
    async fn complete(&self, messages: &[ChatMessage], config: &ChatConfig) -> Result<ChatResult> {
        let request = ChatRequest {
            model: &config.model_id,
            messages,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            top_p: config.top_p,
        };

        debug!(model = %config.model_id, messages = messages.len(), "Requesting chat completion");

        let body = match timeout(config.timeout, self.post_json("chat/completions", &request)).await {
            Ok(result) => result?,
            Err(_) => return Err(Error::Timeout("Chat completion timed out".to_string())),
        };

        parse_chat_response(&body, &config.model_id)
    }

    fn model_id(&self) -> &str {
        &self.config.chat_model
    }
}

#[async_trait]
impl Embedder for OpenAIClient {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: &self.config.embedding_model,
            input: texts,
        };

        debug!(model = %self.config.embedding_model, inputs = texts.len(), "Requesting embeddings");

        let body = match timeout(self.config.timeout, self.post_json("embeddings", &request)).await {
            Ok(result) => result?,
            Err(_) => return Err(Error::Timeout("Embedding request timed out".to_string())),
        };

        let vectors = parse_embedding_response(&body, texts.len())?;
        if let Some(vector) = vectors.iter().find(|v| v.len() != self.config.embedding_dimension) {
            return Err(Error::Embedding(format!(
                "Expected {}-dimensional embeddings, received {}",
                self.config.embedding_dimension,
                vector.len()
            )));
        }

        Ok(vectors)
    }

    fn dimension(&self) -> usize {
        self.config.embedding_dimension
    }

    fn model_id(&self) -> &str {
        &self.config.embedding_model
    }
}
