

use serde::{Deserialize, Serialize};

use crate::planner::scoring::RankedCandidate;

pub const SELECTION_FAILED: &str = "selection failed";


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateVenue {
    pub store_name: String,
    pub score: f64,
    pub similarity: f64,
    pub description: String,
}

impl From<&RankedCandidate> for CandidateVenue {
    fn from(candidate: &RankedCandidate) -> Self {
        Self {
            store_name: candidate.name.clone(),
            score: candidate.total_score,
            similarity: candidate.similarity,
            description: format!("{} 가게입니다.", candidate.raw_category),
        }
    }
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueSelection {

    pub selected: String,

    pub reason: String,
}

impl VenueSelection {
    pub fn new(selected: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            selected: selected.into(),
            reason: reason.into(),
        }
    }

    /// Sentinel returned whenever the external pick cannot be used.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::new(SELECTION_FAILED, reason)
    }

    pub fn is_failure(&self) -> bool {
        self.selected == SELECTION_FAILED
    }
}


#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationContext {
    pub purpose: String,
    pub weather: String,
    pub time_range: String,
}
