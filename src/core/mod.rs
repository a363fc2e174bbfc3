

pub mod config;
pub mod error;

pub use config::{LlmConfig, PlannerConfig, ScoringConfig, SequencerConfig};
pub use error::{PlannerError, Result};
