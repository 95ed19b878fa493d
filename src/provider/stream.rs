//! Streaming chunk wire types.
//!
//! Deliberately lenient: every field defaults, so a chunk missing any part
//! of the `choices[0].delta.content` path still deserializes and simply
//! yields no fragment.

use serde::Deserialize;

/// One streamed chunk from the chat-completions endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct StreamChunk {
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
}

/// A choice in a streaming chunk.
#[derive(Debug, Default, Deserialize)]
pub struct StreamChoice {
    #[serde(default)]
    pub delta: StreamDelta,
}

/// Delta content in a streaming choice.
#[derive(Debug, Default, Deserialize)]
pub struct StreamDelta {
    #[serde(default)]
    pub content: Option<String>,
}

impl StreamChunk {
    /// The incremental text fragment this chunk carries, if any.
    pub fn fragment(&self) -> Option<&str> {
        self.choices.first()?.delta.content.as_deref()
    }
}
