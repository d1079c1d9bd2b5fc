//! Conversation message types.
//!
//! Messages form an append-only log; ordering is conversation order.

use serde::{Deserialize, Serialize};

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message typed by the user (or a suggestion chip they clicked).
    User,
    /// Reply from the assistant.
    Assistant,
}

/// A single message in a scan session's chat log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    /// Whether the analysis chart should be rendered next to this message.
    #[serde(default)]
    pub show_visualization: bool,
    /// Suggestion chips offered with this message.
    #[serde(default)]
    pub suggestions: Vec<String>,
    /// Timestamp when the message was created (ISO 8601 format).
    pub created_at: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            show_visualization: false,
            suggestions: Vec::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn assistant(
        content: impl Into<String>,
        show_visualization: bool,
        suggestions: Vec<String>,
    ) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            show_visualization,
            suggestions,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn is_assistant(&self) -> bool {
        self.role == MessageRole::Assistant
    }

    /// First `max_chars` characters of the content, for list previews.
    pub fn preview(&self, max_chars: usize) -> String {
        let mut chars = self.content.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{head}…")
        } else {
            head
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        let message = ChatMessage::assistant("Hello", true, vec!["Hi".to_string()]);
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["role"], "assistant");
        assert_eq!(value["showVisualization"], true);
        assert_eq!(value["suggestions"][0], "Hi");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let message = ChatMessage::user("✨✨✨✨");
        assert_eq!(message.preview(2), "✨✨…");
        assert_eq!(message.preview(10), "✨✨✨✨");
    }
}
