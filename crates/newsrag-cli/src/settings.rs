//! Runtime settings read from the environment

use anyhow::{Context, Result};

use newsrag_core::ChatConfig;
use newsrag_openai::OpenAIConfig;
use newsrag_rag::QdrantConfig;

/// Settings for the commands that talk to hosted services
#[derive(Debug, Clone)]
pub struct Settings {
    pub openai: OpenAIConfig,
    /// `None` selects the in-memory vector store
    pub qdrant: Option<QdrantConfig>,
}

impl Settings {
    /// Read the OpenAI and Qdrant variables
    pub fn from_env() -> Result<Self> {
        let openai = OpenAIConfig::from_env().context("OpenAI settings are incomplete")?;

        Ok(Self {
            openai,
            qdrant: QdrantConfig::from_env(),
        })
    }

    /// Decoding parameters for answers, on the configured chat model
    pub fn chat_config(&self) -> ChatConfig {
        ChatConfig {
            model_id: self.openai.chat_model.clone(),
            timeout: self.openai.timeout,
            ..ChatConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_config_uses_configured_model() {
        let mut openai = OpenAIConfig::new("key".to_string());
        openai.chat_model = "gpt-4o-mini".to_string();
        let settings = Settings { openai, qdrant: None };

        let config = settings.chat_config();
        assert_eq!(config.model_id, "gpt-4o-mini");
        assert_eq!(config.temperature, Some(0.0));
    }
}
