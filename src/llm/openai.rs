//! OpenAI chat-completions provider.
//!
//! Plain HTTPS client over `/v1/chat/completions`. No retry — a failed call
//! is terminal for the message and surfaces as `LlmError` to the caller.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::LlmError;
use crate::llm::provider::{CompletionRequest, CompletionResponse, FinishReason, LlmProvider};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Per-request deadline. A timeout is treated like any other backend failure.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// OpenAI-compatible chat completion client.
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl OpenAiProvider {
    pub fn new(api_key: SecretString, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.into(),
        }
    }

    /// Override the API base URL (OpenAI-compatible gateways, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = build_request_body(&self.model, &request);
        let url = format!("{}/v1/chat/completions", self.base_url);

        debug!(model = %self.model, "Sending completion request");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed {
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %message, "Generation backend error");
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let api_resp: ApiResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        parse_api_response(api_resp)
    }
}

// ── Wire format ─────────────────────────────────────────────────────

fn build_request_body(model: &str, request: &CompletionRequest) -> serde_json::Value {
    serde_json::json!({
        "model": model,
        "messages": request.messages,
        "temperature": request.temperature,
        "max_tokens": request.max_tokens,
    })
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

fn parse_api_response(resp: ApiResponse) -> Result<CompletionResponse, LlmError> {
    let choice = resp
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse("response contains no choices".into()))?;

    let content = choice
        .message
        .content
        .ok_or_else(|| LlmError::InvalidResponse("first choice has no content".into()))?;

    let finish_reason = choice
        .finish_reason
        .as_deref()
        .map(FinishReason::from_api)
        .unwrap_or(FinishReason::Stop);

    Ok(CompletionResponse {
        content,
        input_tokens: resp.usage.as_ref().map(|u| u.prompt_tokens).unwrap_or(0),
        output_tokens: resp
            .usage
            .as_ref()
            .map(|u| u.completion_tokens)
            .unwrap_or(0),
        finish_reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::ChatMessage;

    #[test]
    fn request_body_shape() {
        let request = CompletionRequest::new(vec![
            ChatMessage::system("persona"),
            ChatMessage::user("Quel est le prix moyen au m² à Nice ?"),
        ])
        .with_temperature(0.3)
        .with_max_tokens(800);

        let body = build_request_body("gpt-4o", &request);
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["max_tokens"], 800);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(
            body["messages"][1]["content"],
            "Quel est le prix moyen au m² à Nice ?"
        );
    }

    #[test]
    fn parses_successful_response() {
        let raw = serde_json::json!({
            "choices": [{
                "message": {"role": "assistant", "content": "Le prix moyen est d'environ 5000€/m²."},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 120, "completion_tokens": 18}
        });
        let resp: ApiResponse = serde_json::from_value(raw).unwrap();
        let parsed = parse_api_response(resp).unwrap();

        assert_eq!(parsed.content, "Le prix moyen est d'environ 5000€/m².");
        assert_eq!(parsed.input_tokens, 120);
        assert_eq!(parsed.output_tokens, 18);
        assert_eq!(parsed.finish_reason, FinishReason::Stop);
    }

    #[test]
    fn empty_choices_is_invalid() {
        let resp: ApiResponse = serde_json::from_value(serde_json::json!({"choices": []})).unwrap();
        assert!(matches!(
            parse_api_response(resp),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[test]
    fn missing_content_is_invalid() {
        let raw = serde_json::json!({
            "choices": [{"message": {"role": "assistant"}, "finish_reason": "stop"}]
        });
        let resp: ApiResponse = serde_json::from_value(raw).unwrap();
        assert!(matches!(
            parse_api_response(resp),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[test]
    fn missing_usage_defaults_to_zero() {
        let raw = serde_json::json!({
            "choices": [{"message": {"content": "ok"}}]
        });
        let resp: ApiResponse = serde_json::from_value(raw).unwrap();
        let parsed = parse_api_response(resp).unwrap();
        assert_eq!(parsed.input_tokens, 0);
        assert_eq!(parsed.output_tokens, 0);
        assert_eq!(parsed.finish_reason, FinishReason::Stop);
    }

    #[tokio::test]
    async fn unreachable_backend_yields_request_failed() {
        let provider = OpenAiProvider::new(SecretString::from("sk-test"), "gpt-4o")
            .with_base_url("http://127.0.0.1:1");
        let request = CompletionRequest::new(vec![ChatMessage::user("bonjour")]);

        let result = provider.complete(request).await;
        assert!(matches!(result, Err(LlmError::RequestFailed { .. })));
    }
}
