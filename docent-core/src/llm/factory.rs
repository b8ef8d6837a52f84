//! Factory for creating LLM providers from configuration

use crate::config::LLMProviderConfig;
use crate::error::{DocentError, Result};
use crate::llm::LLMProvider;
use crate::llm::providers::groq::{DEFAULT_GROQ_MODEL, GROQ_BASE_URL, GroqProvider};
use std::sync::Arc;

/// Factory for creating LLM providers
pub struct LLMProviderFactory;

impl LLMProviderFactory {
    /// Create an LLM provider from configuration
    ///
    /// The API key comes from the config if present, otherwise from
    /// `GROQ_API_KEY`. The model comes from the config, then `GROQ_MODEL`,
    /// then the provider default.
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is available.
    pub fn create(config: &LLMProviderConfig) -> Result<Arc<dyn LLMProvider>> {
        let api_key = match &config.api_key {
            Some(api_key) => api_key.clone(),
            None => std::env::var("GROQ_API_KEY").map_err(|_| {
                DocentError::Configuration(
                    "No API key configured and GROQ_API_KEY is not set".to_string(),
                )
            })?,
        };
        let model = config
            .model
            .clone()
            .or_else(|| std::env::var("GROQ_MODEL").ok())
            .unwrap_or_else(|| DEFAULT_GROQ_MODEL.to_string());
        let base_url = config.base_url.as_deref().unwrap_or(GROQ_BASE_URL);

        let provider = GroqProvider::with_base_url(api_key, model, base_url);

        tracing::info!(
            provider = "groq",
            model = %provider.model(),
            base_url = %provider.base_url(),
            "Created LLM provider"
        );

        Ok(Arc::new(provider))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_with_explicit_key() {
        let config = LLMProviderConfig {
            model: Some("llama-3.3-70b-versatile".to_string()),
            api_key: Some("test-key".to_string()),
            base_url: Some("http://localhost:9999/v1".to_string()),
            ..Default::default()
        };

        let provider = LLMProviderFactory::create(&config).unwrap();
        let info = provider.model_info();
        assert_eq!(info.provider, "groq");
        assert_eq!(info.model_name, "llama-3.3-70b-versatile");
    }
}
