use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::info;

/// Payload handed to the outbound messaging gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageCommand {
    pub email: String,
    pub name: String,
    pub template: String,
    pub message: String,
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_contact: Option<String>,
}

/// Outbound e-mail/SMS hook.
pub trait NotificationService: Send + Sync {
    fn send_message(&self, message: MessageCommand) -> Result<(), NotificationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("messaging transport unavailable: {0}")]
    Transport(String),
}

/// Notifier that records messages and logs them instead of delivering.
#[derive(Debug, Default)]
pub struct OutboxNotifier {
    outbox: Mutex<Vec<MessageCommand>>,
}

impl OutboxNotifier {
    pub fn messages(&self) -> Vec<MessageCommand> {
        self.outbox
            .lock()
            .map(|outbox| outbox.clone())
            .unwrap_or_default()
    }
}

impl NotificationService for OutboxNotifier {
    fn send_message(&self, message: MessageCommand) -> Result<(), NotificationError> {
        info!(to = %message.email, template = %message.template, "queued message");
        self.outbox
            .lock()
            .map_err(|_| NotificationError::Transport("outbox lock poisoned".to_string()))?
            .push(message);
        Ok(())
    }
}
