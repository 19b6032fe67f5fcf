//! Chat message model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageSender {
    User,
    Assistant,
}

/// Unique message identifier, used to key the one-time reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry in the chat log. Never edited after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,

    pub sender: MessageSender,

    /// Plain text, optionally with `**bold**` spans
    pub text: String,

    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(sender: MessageSender, text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            sender,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageSender::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(MessageSender::Assistant, text)
    }

    pub fn is_assistant(&self) -> bool {
        self.sender == MessageSender::Assistant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = ChatMessage::user("hi");
        let b = ChatMessage::user("hi");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_sender_serializes_lowercase() {
        let json = serde_json::to_string(&MessageSender::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
        assert!(ChatMessage::assistant("ok").is_assistant());
    }
}
