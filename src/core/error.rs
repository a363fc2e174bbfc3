

use thiserror::Error;

use crate::llm::providers::LlmProviderError;


#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Preference vector must have {expected} dimensions, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Venue table error: {0}")]
    Dataset(String),

    #[error("Embedding model error: {0}")]
    Embedding(String),

    #[error("No recommendations found for the requested time range")]
    NoRecommendations,

    #[error("LLM provider error: {0}")]
    LlmProvider(#[from] LlmProviderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl PlannerError {
    pub fn dimension_mismatch(actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: crate::PREFERENCE_DIMS,
            actual,
        }
    }

    /// Errors caused by the caller's input rather than by the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::DimensionMismatch { .. }
                | Self::InvalidTime(_)
                | Self::Validation(_)
                | Self::NoRecommendations
        )
    }
}

impl From<config::ConfigError> for PlannerError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}


pub type Result<T> = std::result::Result<T, PlannerError>;
