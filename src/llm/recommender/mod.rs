

pub mod engine;
pub mod models;
pub mod prompt;

pub use engine::{LlmVenueRecommender, VenueRecommender};
pub use models::{CandidateVenue, RecommendationContext, VenueSelection, SELECTION_FAILED};
