//! Shared types for the chat provider.

use serde::{Deserialize, Serialize};

/// Who authored a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn in the conversation.
///
/// Serializes to the `{role, content}` shape the chat-completions API
/// expects, so the same type is used for history and for the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Events delivered to the caller's sink while a response streams in.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// An incremental piece of assistant text, in stream order.
    TextDelta(String),
    /// The stream finished cleanly (sentinel or natural end-of-data).
    Done,
}
