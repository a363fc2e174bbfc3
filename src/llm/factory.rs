

use std::sync::Arc;
use std::time::Duration;

use super::providers::base::{LlmProvider, LlmProviderError};
use super::providers::ollama::{DEFAULT_OLLAMA_URL, OllamaProvider};
use super::providers::openai::OpenAiProvider;
use crate::core::config::LlmConfig;


pub struct LlmProviderFactory;

impl LlmProviderFactory {

    pub fn create(
        provider: &str,
        model: &str,
        api_key: Option<&str>,
        base_url: Option<&str>,
        temperature: f64,
        timeout: Duration,
    ) -> Result<Arc<dyn LlmProvider>, LlmProviderError> {
        match provider.to_lowercase().as_str() {
            "openai" => {
                let api_key = api_key.ok_or_else(|| {
                    LlmProviderError::Provider("OPENAI_API_KEY is not set".to_string())
                })?;
                Ok(Arc::new(OpenAiProvider::new(
                    api_key,
                    base_url.map(String::from),
                    model,
                    temperature,
                    timeout,
                )?))
            }
            "ollama" => Ok(Arc::new(OllamaProvider::new(
                base_url.unwrap_or(DEFAULT_OLLAMA_URL),
                model,
                temperature,
                timeout,
            )?)),
            other => Err(LlmProviderError::UnknownProvider(other.to_string())),
        }
    }


    pub fn from_config(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmProviderError> {
        Self::create(
            &config.provider,
            &config.model,
            config.api_key.as_deref(),
            config.base_url.as_deref(),
            config.temperature,
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_ollama_provider() {
        let provider = LlmProviderFactory::create(
            "ollama",
            "llama3.1:8b",
            None,
            None,
            0.7,
            Duration::from_secs(10),
        )
        .unwrap();
        assert_eq!(provider.provider_name(), "ollama");
        assert_eq!(provider.model_name(), "llama3.1:8b");
    }

    #[test]
    fn test_create_openai_provider() {
        let provider = LlmProviderFactory::create(
            "OpenAI",
            "gpt-4o",
            Some("test-key"),
            None,
            0.3,
            Duration::from_secs(10),
        )
        .unwrap();
        assert_eq!(provider.provider_name(), "openai");
    }

    #[test]
    fn test_openai_without_key_fails() {
        let result = LlmProviderFactory::from_config(&LlmConfig::default());
        assert!(matches!(result, Err(LlmProviderError::Provider(_))));
    }

    #[test]
    fn test_unknown_provider() {
        let result = LlmProviderFactory::create(
            "unknown",
            "model",
            None,
            None,
            0.5,
            Duration::from_secs(1),
        );
        assert!(matches!(result, Err(LlmProviderError::UnknownProvider(_))));
    }
}
