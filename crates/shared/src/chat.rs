//! Chat gateway contract.
//!
//! The chat-platform gateway posts one `ChatMessage` per inbound message and
//! relays the returned replies to the same conversation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One inbound chat message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub text: String,
    /// Display name of the author; session state is keyed by it
    pub author_display_name: String,
    /// Platform token that @-mentions the author (e.g. `<@1234>`)
    #[serde(default)]
    pub author_mention: String,
    /// Users explicitly mentioned in the message, resolved by the platform
    #[serde(default)]
    pub explicit_mentions: Vec<MentionTarget>,
    /// Role names held by the author
    #[serde(default)]
    pub author_roles: Vec<String>,
}

impl ChatMessage {
    pub fn new(author_display_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author_display_name: author_display_name.into(),
            ..Self::default()
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.author_roles.iter().any(|held| held == role)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionTarget {
    pub display_name: String,
    #[serde(default)]
    pub mention: String,
}

/// One outbound message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    /// Structured payload too large for a chat line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, filename: impl Into<String>, content: Value) -> Self {
        self.attachment = Some(Attachment {
            filename: filename.into(),
            content,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    pub content: Value,
}

/// Body returned to the gateway for one inbound message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub replies: Vec<Reply>,
}
