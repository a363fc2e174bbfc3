

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::models::{CandidateVenue, RecommendationContext, VenueSelection};
use super::prompt::{build_selection_prompt, SYSTEM_PROMPT};
use crate::core::config::LlmConfig;
use crate::llm::providers::base::{LlmProvider, LlmProviderError};


/// Picks one venue out of a slot's candidates. Never fails: problems become
/// the `selection failed` sentinel.
#[async_trait]
pub trait VenueRecommender: Send + Sync {
    async fn recommend(
        &self,
        candidates: &[CandidateVenue],
        context: &RecommendationContext,
    ) -> VenueSelection;
}


pub struct LlmVenueRecommender {

    llm: Arc<dyn LlmProvider>,

    timeout: Duration,

    max_retries: u32,
}

impl LlmVenueRecommender {

    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        info!(
            "LlmVenueRecommender initialized: provider={}, model={}",
            llm.provider_name(),
            llm.model_name()
        );

        Self {
            llm,
            timeout: Duration::from_secs(30),
            max_retries: 1,
        }
    }

    pub fn from_config(llm: Arc<dyn LlmProvider>, config: &LlmConfig) -> Self {
        Self::new(llm)
            .with_timeout(Duration::from_secs(config.timeout_secs))
            .with_max_retries(config.max_retries)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    async fn call(&self, prompt: &str) -> Result<String, LlmProviderError> {
        let mut attempt = 0;
        loop {
            let result = tokio::time::timeout(
                self.timeout,
                self.llm.generate(SYSTEM_PROMPT, prompt, Some("json_object")),
            )
            .await
            .unwrap_or(Err(LlmProviderError::Timeout(self.timeout)));

            match result {
                Ok((response, _metadata)) => return Ok(response),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!("Transient LLM failure ({}), retry {}/{}", e, attempt, self.max_retries);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl VenueRecommender for LlmVenueRecommender {
    async fn recommend(
        &self,
        candidates: &[CandidateVenue],
        context: &RecommendationContext,
    ) -> VenueSelection {
        if candidates.is_empty() {
            return VenueSelection::failed("no candidates to choose from");
        }

        let prompt = build_selection_prompt(candidates, context);
        debug!(
            "Calling LLM for selection: slot={}, candidates={}",
            context.time_range,
            candidates.len()
        );

        let response = match self.call(&prompt).await {
            Ok(response) => response,
            Err(e) => {
                warn!("LLM call failed: {}", e);
                return VenueSelection::failed(e.to_string());
            }
        };

        let selection: VenueSelection = match serde_json::from_str(&response) {
            Ok(selection) => selection,
            Err(e) => {
                warn!("Failed to parse LLM response as JSON: {}", e);
                warn!("Response was: {}", crate::safe_truncate(&response, 200));
                return VenueSelection::failed(format!("malformed selection JSON: {e}"));
            }
        };

        let selected = selection.selected.trim();
        if !candidates.iter().any(|c| c.store_name == selected) {
            warn!("LLM selected '{}', which is not a candidate", selected);
            return VenueSelection::failed(format!("'{selected}' is not one of the candidates"));
        }

        info!("Selected '{}' for {}", selected, context.time_range);
        VenueSelection::new(selected, selection.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::providers::mock::ScriptedProvider;

    fn candidates() -> Vec<CandidateVenue> {
        ["카페 A", "카페 B", "카페 C"]
            .iter()
            .map(|name| CandidateVenue {
                store_name: name.to_string(),
                score: 1.0,
                similarity: 0.9,
                description: "카페 가게입니다.".into(),
            })
            .collect()
    }

    fn context() -> RecommendationContext {
        RecommendationContext {
            purpose: "로맨틱".into(),
            weather: "맑음".into(),
            time_range: "13:00 ~ 14:59".into(),
        }
    }

    fn timeout() -> LlmProviderError {
        LlmProviderError::Timeout(Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_valid_selection() {
        let provider = Arc::new(ScriptedProvider::replying(
            r#"{"selected": " 카페 B ", "reason": "분위기가 좋아요"}"#,
        ));
        let recommender = LlmVenueRecommender::new(provider.clone());

        let selection = recommender.recommend(&candidates(), &context()).await;
        assert_eq!(selection, VenueSelection::new("카페 B", "분위기가 좋아요"));
        assert!(provider.prompts()[0].contains("카페 C"));
    }

    #[tokio::test]
    async fn test_unknown_name_degrades_to_sentinel() {
        let provider = ScriptedProvider::replying(r#"{"selected": "카페 Z", "reason": "?"}"#);
        let selection = LlmVenueRecommender::new(Arc::new(provider))
            .recommend(&candidates(), &context())
            .await;
        assert!(selection.is_failure());
        assert!(selection.reason.contains("카페 Z"));
    }

    #[tokio::test]
    async fn test_malformed_json_degrades_to_sentinel() {
        let provider = ScriptedProvider::replying("카페 A가 좋아요");
        let selection = LlmVenueRecommender::new(Arc::new(provider))
            .recommend(&candidates(), &context())
            .await;
        assert!(selection.is_failure());
    }

    #[tokio::test]
    async fn test_retries_once_on_transient_failure() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(timeout()),
            Ok(r#"{"selected": "카페 A", "reason": "가까워요"}"#.into()),
        ]));
        let selection = LlmVenueRecommender::new(provider.clone())
            .recommend(&candidates(), &context())
            .await;
        assert_eq!(selection.selected, "카페 A");
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_gives_up_after_retry() {
        let provider = Arc::new(ScriptedProvider::new(vec![Err(timeout()), Err(timeout())]));
        let selection = LlmVenueRecommender::new(provider.clone())
            .recommend(&candidates(), &context())
            .await;
        assert!(selection.is_failure());
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_no_retry_on_provider_error() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(LlmProviderError::Provider("No choices in response".into())),
            Ok(r#"{"selected": "카페 A", "reason": "-"}"#.into()),
        ]));
        let selection = LlmVenueRecommender::new(provider.clone())
            .recommend(&candidates(), &context())
            .await;
        assert!(selection.is_failure());
        assert!(selection.reason.contains("No choices"));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_candidates_skip_llm() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let selection = LlmVenueRecommender::new(provider.clone())
            .recommend(&[], &context())
            .await;
        assert!(selection.is_failure());
        assert_eq!(provider.calls(), 0);
    }
}
