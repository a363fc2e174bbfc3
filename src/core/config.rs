

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::Result;


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {

    #[serde(default = "default_top_k")]
    pub top_k: usize,

    #[serde(default = "default_true")]
    pub keyword_scoring: bool,

    /// Bonus added once per distinct matching keyword.
    #[serde(default = "default_keyword_weight")]
    pub keyword_weight: f64,

    #[serde(default = "default_true")]
    pub distance_filtering: bool,

    #[serde(default = "default_max_distance_km")]
    pub max_distance_km: f64,

    /// Bonus for the candidate closest to the center point.
    #[serde(default = "default_distance_bonus_cap")]
    pub distance_bonus_cap: f64,
}

fn default_top_k() -> usize { 3 }
fn default_true() -> bool { true }
fn default_keyword_weight() -> f64 { 0.2 }
fn default_max_distance_km() -> f64 { 5.0 }
fn default_distance_bonus_cap() -> f64 { 0.3 }

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            keyword_scoring: default_true(),
            keyword_weight: default_keyword_weight(),
            distance_filtering: default_true(),
            max_distance_km: default_max_distance_km(),
            distance_bonus_cap: default_distance_bonus_cap(),
        }
    }
}


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequencerConfig {

    #[serde(default = "default_categories_per_slot")]
    pub categories_per_slot: usize,

    #[serde(default = "default_similar_top_n")]
    pub similar_top_n: usize,

    #[serde(default = "default_fallback_categories")]
    pub fallback_categories: usize,
}

fn default_categories_per_slot() -> usize { 3 }
fn default_similar_top_n() -> usize { 30 }
fn default_fallback_categories() -> usize { 5 }

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            categories_per_slot: default_categories_per_slot(),
            similar_top_n: default_similar_top_n(),
            fallback_categories: default_fallback_categories(),
        }
    }
}


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_provider")]
    pub provider: String,

    #[serde(default = "default_llm_model")]
    pub model: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_llm_temperature")]
    pub temperature: f64,

    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,

    /// Extra attempts after a transient network failure.
    #[serde(default = "default_llm_retries")]
    pub max_retries: u32,
}

fn default_llm_provider() -> String { "openai".to_string() }
fn default_llm_model() -> String { "gpt-4o".to_string() }
fn default_llm_temperature() -> f64 { 0.7 }
fn default_llm_timeout() -> u64 { 30 }
fn default_llm_retries() -> u32 { 1 }

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            model: default_llm_model(),
            api_key: None,
            base_url: None,
            temperature: default_llm_temperature(),
            timeout_secs: default_llm_timeout(),
            max_retries: default_llm_retries(),
        }
    }
}


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default = "default_venue_table_path")]
    pub venue_table_path: PathBuf,

    #[serde(default = "default_embedding_model_path")]
    pub embedding_model_path: PathBuf,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub sequencer: SequencerConfig,

    #[serde(default)]
    pub llm: LlmConfig,
}

fn default_venue_table_path() -> PathBuf { PathBuf::from("data/stores_with_preferences_vec.csv") }
fn default_embedding_model_path() -> PathBuf { PathBuf::from("data/w2v_activity_model.txt") }

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            venue_table_path: default_venue_table_path(),
            embedding_model_path: default_embedding_model_path(),
            scoring: ScoringConfig::default(),
            sequencer: SequencerConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl PlannerConfig {

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(crate::ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        );

        let mut loaded: Self = builder.build()?.try_deserialize()?;
        loaded.apply_env_overrides();
        Ok(loaded)
    }


    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(path) = std::env::var("DATECOURSE_VENUE_TABLE") {
            config.venue_table_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("DATECOURSE_EMBEDDING_MODEL") {
            config.embedding_model_path = PathBuf::from(path);
        }
        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        if self.llm.api_key.is_none() {
            if let Ok(key) = std::env::var("OPENAI_API_KEY") {
                self.llm.api_key = Some(key);
            }
        }
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            self.llm.model = model;
        }
    }
}
