

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::models::SurveyQuestion;
use super::prompt::{build_question_prompt, SYSTEM_PROMPT};
use crate::core::error::{PlannerError, Result};
use crate::llm::providers::base::LlmProvider;


pub struct QuestionGenerator {

    llm: Arc<dyn LlmProvider>,
}

impl QuestionGenerator {

    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        info!(
            "QuestionGenerator initialized: provider={}, model={}",
            llm.provider_name(),
            llm.model_name()
        );
        Self { llm }
    }

    /// Asks the model for one question and rejects anything outside the delta rules.
    pub async fn generate(&self) -> Result<SurveyQuestion> {
        let prompt = build_question_prompt();
        let (response, metadata) = self
            .llm
            .generate(SYSTEM_PROMPT, &prompt, Some("json_object"))
            .await?;

        debug!(
            "Question response from {}: tokens={:?}",
            metadata.provider, metadata.tokens_total
        );

        let question: SurveyQuestion = serde_json::from_str(&response).map_err(|e| {
            warn!("Response was: {}", crate::safe_truncate(&response, 200));
            PlannerError::Validation(format!("malformed question JSON: {e}"))
        })?;
        question.validate()?;

        info!("Generated question: '{}'", crate::safe_truncate(&question.question, 60));
        Ok(question)
    }
}
