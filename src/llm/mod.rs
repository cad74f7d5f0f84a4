//! LLM integration — one polymorphic seam (`LlmProvider`) over the
//! generation backend, with an OpenAI chat-completions implementation.

mod openai;
pub mod provider;

pub use openai::OpenAiProvider;
pub use provider::{
    ChatMessage, CompletionRequest, CompletionResponse, FinishReason, LlmProvider, Role,
};

use std::sync::Arc;

use crate::config::Config;

/// Create the generation backend client from configuration.
pub fn create_provider(config: &Config) -> Arc<dyn LlmProvider> {
    tracing::info!(model = %config.model, "Using OpenAI generation backend");
    Arc::new(OpenAiProvider::new(
        config.openai_api_key.clone(),
        config.model.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    #[test]
    fn provider_reports_configured_model() {
        let provider = OpenAiProvider::new(SecretString::from("sk-test"), "gpt-4o-mini");
        assert_eq!(provider.model_name(), "gpt-4o-mini");
    }
}
