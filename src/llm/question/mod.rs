

pub mod generator;
pub mod models;
pub mod prompt;

pub use generator::QuestionGenerator;
pub use models::{SurveyQuestion, VectorChange};
