//! OpenAI client configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use newsrag_core::{Error, Result};

/// Configuration for the OpenAI-compatible client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub base_url: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub embedding_dimension: usize,
    pub timeout: Duration,
}

impl OpenAIConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";
    pub const DEFAULT_CHAT_MODEL: &'static str = "gpt-3.5-turbo";
    pub const DEFAULT_EMBEDDING_MODEL: &'static str = "text-embedding-ada-002";
    pub const DEFAULT_EMBEDDING_DIMENSION: usize = 1536;

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = env::var("OPENAI_API_KEY").map_err(|_| {
            Error::Configuration("OPENAI_API_KEY environment variable not found".to_string())
        })?;

        let mut config = Self::new(api_key);

        if let Ok(base_url) = env::var("OPENAI_BASE_URL") {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Ok(model) = env::var("NEWSRAG_CHAT_MODEL") {
            config.chat_model = model;
        }
        if let Ok(model) = env::var("NEWSRAG_EMBEDDING_MODEL") {
            config.embedding_model = model;
        }
        if let Ok(dimension) = env::var("NEWSRAG_EMBEDDING_DIMENSION") {
            config.embedding_dimension = dimension.parse().map_err(|_| {
                Error::Configuration(format!(
                    "NEWSRAG_EMBEDDING_DIMENSION must be a positive integer, got {}",
                    dimension
                ))
            })?;
        }

        Ok(config)
    }

    /// Create configuration with explicit values
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            chat_model: Self::DEFAULT_CHAT_MODEL.to_string(),
            embedding_model: Self::DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_dimension: Self::DEFAULT_EMBEDDING_DIMENSION,
            timeout: Duration::from_secs(60),
        }
    }
}
