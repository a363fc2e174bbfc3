

pub mod core;
pub mod data;
pub mod llm;
pub mod planner;
pub mod utils;

pub use utils::{format_minutes, safe_truncate};


pub use crate::core::config::PlannerConfig;
pub use crate::core::error::{PlannerError, Result};
pub use crate::planner::{PlanRequest, PlanResponse, PlannerContext, PlannerService};


/// Length of every preference and venue vector.
pub const PREFERENCE_DIMS: usize = 50;


/// Prefix for `DATECOURSE__*` configuration variables.
pub const ENV_PREFIX: &str = "DATECOURSE";
