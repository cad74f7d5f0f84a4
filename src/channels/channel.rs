//! Channel abstraction — pure message I/O, no business logic.

use std::pin::Pin;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::Stream;
use uuid::Uuid;

use crate::error::ChannelError;

/// Stream of inbound messages produced by a running channel.
pub type MessageStream = Pin<Box<dyn Stream<Item = IncomingMessage> + Send>>;

/// Inbound message in channel-neutral form.
///
/// Immutable once received; scoped to a single pipeline invocation.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// Unique ID (channel-native or generated).
    pub id: String,
    /// Source channel, e.g. "telegram".
    pub channel: String,
    /// Opaque sender identifier.
    pub sender: String,
    /// Human-readable sender name, if the platform provides one.
    pub sender_name: Option<String>,
    /// Message text. May be empty — the pipeline guards on it.
    pub content: String,
    /// Channel-specific reply routing data (Telegram chat id).
    pub reply_metadata: serde_json::Value,
    pub received_at: DateTime<Utc>,
}

impl IncomingMessage {
    pub fn new(channel: &str, sender: &str, content: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            channel: channel.to_string(),
            sender: sender.to_string(),
            sender_name: None,
            content: content.to_string(),
            reply_metadata: serde_json::Value::Null,
            received_at: Utc::now(),
        }
    }

    pub fn with_sender_name(mut self, name: &str) -> Self {
        self.sender_name = Some(name.to_string());
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.reply_metadata = metadata;
        self
    }

    /// Display name for operator-facing output, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.sender_name.as_deref().unwrap_or(&self.sender)
    }
}

/// Outbound reply to an inbound message.
#[derive(Debug, Clone)]
pub struct OutgoingResponse {
    pub content: String,
}

impl OutgoingResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// A chat transport the pipeline can receive from and reply through.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Channel name for logging.
    fn name(&self) -> &str;

    /// Start listening and return the inbound message stream.
    async fn start(&self) -> Result<MessageStream, ChannelError>;

    /// Send a reply to the conversation the message came from.
    async fn respond(
        &self,
        msg: &IncomingMessage,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError>;

    /// Verify the channel can reach its platform.
    async fn health_check(&self) -> Result<(), ChannelError>;
}

/// Side-channel text delivery to an arbitrary conversation — used for
/// operator alerts, which are not replies to any inbound message.
#[async_trait]
pub trait OutboundSender: Send + Sync {
    async fn send_text(&self, chat_id: &str, text: &str) -> Result<(), ChannelError>;
}
