

pub mod base;
#[cfg(test)]
pub mod mock;
pub mod ollama;
pub mod openai;

pub use base::{LlmMetadata, LlmProvider, LlmProviderError};
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;
