

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::base::{LlmMetadata, LlmProvider, LlmProviderError};


/// Replays canned responses in order; an exhausted script answers with a provider error.
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<Result<String, LlmProviderError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<Result<String, LlmProviderError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(response: &str) -> Self {
        Self::new(vec![Ok(response.to_string())])
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn generate(
        &self,
        _system_prompt: &str,
        user_prompt: &str,
        _response_format: Option<&str>,
    ) -> Result<(String, LlmMetadata), LlmProviderError> {
        self.prompts.lock().unwrap().push(user_prompt.to_string());
        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmProviderError::Provider("script exhausted".into())));

        next.map(|content| {
            (
                content,
                LlmMetadata {
                    provider: "scripted".into(),
                    model: "test".into(),
                    ..Default::default()
                },
            )
        })
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "test"
    }
}
