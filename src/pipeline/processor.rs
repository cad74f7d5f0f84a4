//! Message pipeline — orchestrates matcher, alert, generator and composer
//! for each inbound message.
//!
//! Per-message state machine, stateless across messages:
//! `Received → Matched → (Alerted) → Generated → Composed → Sent`.
//!
//! Invariant: every message with non-empty text yields exactly one composed
//! reply, regardless of downstream failures. Generation failure degrades to
//! the fixed apology; only reply emission itself can end a message silently.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, error, info};

use crate::channels::channel::{Channel, IncomingMessage, OutgoingResponse};
use crate::config;
use crate::error::PipelineError;
use crate::pipeline::alert::AlertDispatcher;
use crate::pipeline::compose::compose_reply;
use crate::pipeline::generator::{GenerationResult, ResponseGenerator};
use crate::pipeline::keywords::KeywordMatcher;
use crate::pipeline::types::Command;

/// Per-message orchestrator. Shared read-only across concurrent messages.
pub struct MessagePipeline {
    channel: Arc<dyn Channel>,
    matcher: KeywordMatcher,
    alerts: AlertDispatcher,
    generator: ResponseGenerator,
}

impl MessagePipeline {
    pub fn new(
        channel: Arc<dyn Channel>,
        matcher: KeywordMatcher,
        alerts: AlertDispatcher,
        generator: ResponseGenerator,
    ) -> Self {
        Self {
            channel,
            matcher,
            alerts,
            generator,
        }
    }

    /// Process one inbound message, absorbing every fault.
    ///
    /// This is the pipeline boundary: no error escapes to the caller, so a
    /// poisoned message can never take down the process or other messages.
    /// A panic in any stage is caught here and answered with the generic
    /// error reply; the user never sees the fault itself.
    pub async fn handle(&self, msg: IncomingMessage) {
        match AssertUnwindSafe(self.process(&msg)).catch_unwind().await {
            Ok(Ok(())) => {}
            Ok(Err(PipelineError::Emission(reason))) => {
                // Terminal: no retry, no fallback channel
                error!(id = %msg.id, sender = %msg.sender, %reason, "Reply emission failed");
            }
            Err(panic) => {
                let reason = panic_message(panic.as_ref());
                error!(id = %msg.id, sender = %msg.sender, %reason, "Unhandled pipeline fault");
                let fallback = OutgoingResponse::new(config::GENERIC_ERROR_REPLY);
                if let Err(send_err) = self.channel.respond(&msg, fallback).await {
                    error!(id = %msg.id, error = %send_err, "Failed to deliver fault reply");
                }
            }
        }
    }

    async fn process(&self, msg: &IncomingMessage) -> Result<(), PipelineError> {
        let text = msg.content.trim();

        // Received guard: nothing to answer
        if text.is_empty() {
            debug!(id = %msg.id, "Empty message, no reply");
            return Ok(());
        }

        // Commands bypass generation and composition entirely
        if let Some(command) = Command::parse(text) {
            let reply = match command {
                Command::Start => config::WELCOME_MESSAGE,
                Command::Help => config::HELP_MESSAGE,
            };
            debug!(id = %msg.id, ?command, "Command handled");
            return self.send(msg, reply).await;
        }

        // Unrecognized commands get no reply at all
        if text.starts_with('/') {
            debug!(id = %msg.id, "Unknown command, dropped");
            return Ok(());
        }

        // Matched → Alerted: fire-and-forget, runs alongside generation
        if let Some(keyword) = self.matcher.find(text) {
            info!(keyword, sender = %msg.sender, "Sensitive keyword detected");
            let _alert = self.alerts.dispatch(keyword, msg);
        }

        // Generated: failure is a visible branch, mapped to the apology
        let body = match self.generator.generate(text).await {
            GenerationResult::Success { text } => text,
            GenerationResult::Failure { .. } => config::GENERATION_APOLOGY.to_string(),
        };

        // Composed → Sent
        self.send(msg, &compose_reply(&body)).await
    }

    async fn send(&self, msg: &IncomingMessage, content: &str) -> Result<(), PipelineError> {
        self.channel
            .respond(msg, OutgoingResponse::new(content))
            .await
            .map_err(|e| PipelineError::Emission(e.to_string()))
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
