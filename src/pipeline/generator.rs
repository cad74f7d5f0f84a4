//! Response generation — one completion call per message, failures
//! normalized into an explicit result instead of propagating.

use std::sync::Arc;

use tracing::{debug, error};

use crate::config;
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};

/// Outcome of a generation attempt. `Failure` is a visible branch the
/// pipeline maps to the fixed apology — never a user-facing error.
#[derive(Debug, Clone)]
pub enum GenerationResult {
    Success { text: String },
    Failure { reason: String },
}

/// Builds the role-scoped prompt and calls the generation backend.
pub struct ResponseGenerator {
    llm: Arc<dyn LlmProvider>,
    temperature: f32,
    max_tokens: u32,
}

impl ResponseGenerator {
    pub fn new(llm: Arc<dyn LlmProvider>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            llm,
            temperature,
            max_tokens,
        }
    }

    /// Issue a single completion request for the user's question.
    ///
    /// The system instruction is fixed per deployment and never derived from
    /// the message. Any failure (network, API, malformed response, timeout)
    /// is logged in full and returned as `Failure`. No retry.
    pub async fn generate(&self, user_prompt: &str) -> GenerationResult {
        let request = CompletionRequest::new(vec![
            ChatMessage::system(config::SYSTEM_PROMPT),
            ChatMessage::user(user_prompt),
        ])
        .with_temperature(self.temperature)
        .with_max_tokens(self.max_tokens);

        match self.llm.complete(request).await {
            Ok(response) => {
                debug!(
                    model = self.llm.model_name(),
                    input_tokens = response.input_tokens,
                    output_tokens = response.output_tokens,
                    "Generation succeeded"
                );
                GenerationResult::Success {
                    text: response.content.trim().to_string(),
                }
            }
            Err(e) => {
                error!(error = %e, model = self.llm.model_name(), "Generation backend call failed");
                GenerationResult::Failure {
                    reason: e.to_string(),
                }
            }
        }
    }
}
