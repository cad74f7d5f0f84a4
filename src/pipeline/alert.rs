//! Operator alerting for sensitive keywords.
//!
//! Fire-and-forget: the alert runs as its own task so its latency or failure
//! never reaches the reply path. Delivery failure is logged and swallowed.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::channels::channel::{IncomingMessage, OutboundSender};

/// Sends a side-channel notification when a sensitive term is found.
pub struct AlertDispatcher {
    sender: Arc<dyn OutboundSender>,
    /// Destination chat. `None` ⇒ alerting is a no-op, not an error.
    alert_chat_id: Option<String>,
}

impl AlertDispatcher {
    pub fn new(sender: Arc<dyn OutboundSender>, alert_chat_id: Option<String>) -> Self {
        Self {
            sender,
            alert_chat_id,
        }
    }

    /// Spawn the alert send for a matched keyword.
    ///
    /// Returns the task handle (`None` when no destination is configured) so
    /// tests can await delivery; the pipeline ignores it.
    pub fn dispatch(&self, keyword: &str, msg: &IncomingMessage) -> Option<JoinHandle<()>> {
        let Some(chat_id) = self.alert_chat_id.clone() else {
            debug!(keyword, "Sensitive keyword matched but no alert destination configured");
            return None;
        };

        let body = build_alert_body(keyword, msg.display_name(), &msg.sender);
        let sender = Arc::clone(&self.sender);

        Some(tokio::spawn(async move {
            if let Err(e) = sender.send_text(&chat_id, &body).await {
                warn!(error = %e, "Failed to deliver operator alert");
            }
        }))
    }
}

/// Human-readable alert body embedding the matched term and the sender.
fn build_alert_body(keyword: &str, sender_name: &str, sender_id: &str) -> String {
    format!(
        "Mot clé sensible détecté: '{keyword}' dans le message de {sender_name} ({sender_id})."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::error::ChannelError;

    /// Records sent alerts, optionally failing every send.
    struct RecordingSender {
        sent: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    impl RecordingSender {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
                fail,
            })
        }
    }

    #[async_trait]
    impl OutboundSender for RecordingSender {
        async fn send_text(&self, chat_id: &str, text: &str) -> Result<(), ChannelError> {
            if self.fail {
                return Err(ChannelError::SendFailed {
                    name: "mock".into(),
                    reason: "unreachable".into(),
                });
            }
            self.sent
                .lock()
                .unwrap()
                .push((chat_id.to_string(), text.to_string()));
            Ok(())
        }
    }

    fn message() -> IncomingMessage {
        IncomingMessage::new("telegram", "123456789", "Je veux faire un procès")
            .with_sender_name("Alice")
    }

    #[tokio::test]
    async fn dispatches_one_alert_to_configured_destination() {
        let sender = RecordingSender::new(false);
        let dispatcher = AlertDispatcher::new(sender.clone(), Some("987654".into()));

        let handle = dispatcher.dispatch("procès", &message()).unwrap();
        handle.await.unwrap();

        let sent = sender.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "987654");
        assert!(sent[0].1.contains("procès"));
        assert!(sent[0].1.contains("Alice"));
        assert!(sent[0].1.contains("123456789"));
    }

    #[tokio::test]
    async fn no_destination_means_no_alert() {
        let sender = RecordingSender::new(false);
        let dispatcher = AlertDispatcher::new(sender.clone(), None);

        assert!(dispatcher.dispatch("procès", &message()).is_none());
        assert!(sender.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn delivery_failure_is_swallowed() {
        let sender = RecordingSender::new(true);
        let dispatcher = AlertDispatcher::new(sender, Some("987654".into()));

        // The task must complete without panicking despite the send error
        let handle = dispatcher.dispatch("litige", &message()).unwrap();
        handle.await.unwrap();
    }

    #[test]
    fn alert_body_embeds_keyword_and_sender() {
        let body = build_alert_body("avocat", "Alice", "42");
        assert_eq!(
            body,
            "Mot clé sensible détecté: 'avocat' dans le message de Alice (42)."
        );
    }
}
