

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::base::{ChatMessage, LlmMetadata, LlmProvider, LlmProviderError};
use crate::utils::safe_truncate;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";


#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    message: Option<ChatMessage>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}


/// Local models served by Ollama's `/api/chat` endpoint.
pub struct OllamaProvider {
    base_url: String,
    model: String,
    temperature: f64,
    client: Client,
}

impl OllamaProvider {

    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        temperature: f64,
        timeout: Duration,
    ) -> Result<Self, LlmProviderError> {
        let provider = Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            temperature,
            client: Client::builder().timeout(timeout).build()?,
        };
        info!("Ollama provider ready: model={}, url={}", provider.model, provider.base_url);
        Ok(provider)
    }

    fn request_body(&self, system_prompt: &str, user_prompt: &str, response_format: Option<&str>) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": ChatMessage::conversation(system_prompt, user_prompt),
            "stream": false,
            "options": { "temperature": self.temperature },
        });
        // only a bare "json" switch exists here
        if response_format == Some("json_object") {
            body["format"] = json!("json");
        }
        body
    }

    /// Ollama reports failures as `{"error": "..."}`, on error statuses as well as on 200.
    fn parse_reply(status: StatusCode, body: &str) -> Result<ChatReply, LlmProviderError> {
        let reply = serde_json::from_str::<ChatReply>(body);
        if !status.is_success() {
            let message = match reply {
                Ok(ChatReply { error: Some(error), .. }) => error,
                _ => safe_truncate(body.trim(), 200),
            };
            return Err(LlmProviderError::Status { status: status.as_u16(), message });
        }
        let reply = reply?;
        if let Some(error) = reply.error {
            return Err(LlmProviderError::Provider(error));
        }
        Ok(reply)
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        response_format: Option<&str>,
    ) -> Result<(String, LlmMetadata), LlmProviderError> {
        let url = format!("{}/api/chat", self.base_url);
        debug!("POST {} (model={})", url, self.model);

        let response = self
            .client
            .post(&url)
            .json(&self.request_body(system_prompt, user_prompt, response_format))
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        let reply = Self::parse_reply(status, &body)?;
        let content = reply
            .message
            .map(|m| m.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| LlmProviderError::Provider("Empty reply from Ollama".to_string()))?;

        let metadata = LlmMetadata {
            provider: "ollama".to_string(),
            model: self.model.clone(),
            base_url: Some(self.base_url.clone()),
            tokens_prompt: reply.prompt_eval_count,
            tokens_completion: reply.eval_count,
            tokens_total: reply.prompt_eval_count.zip(reply.eval_count).map(|(p, c)| p + c),
        };
        Ok((content, metadata))
    }

    fn provider_name(&self) -> &str {
        "ollama"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
