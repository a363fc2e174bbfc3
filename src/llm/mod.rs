

pub mod factory;
pub mod providers;
pub mod question;
pub mod recommender;

pub use factory::LlmProviderFactory;
pub use providers::{LlmMetadata, LlmProvider, LlmProviderError};
pub use question::{QuestionGenerator, SurveyQuestion, VectorChange};
pub use recommender::{LlmVenueRecommender, VenueRecommender, VenueSelection};
