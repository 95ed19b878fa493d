//! Chat-completions request types and the request builder.

use super::types::{ChatMessage, Role};
use serde::Serialize;

/// Outbound request body for `POST /chat/completions`.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    pub temperature: f32,
}

/// Build the request for one send operation.
///
/// Prepends exactly one system message synthesized from the current prompt
/// text ahead of the full history (which already ends with the new user
/// turn). The system message is never part of the stored history.
pub(crate) fn build_request(
    model: &str,
    system_prompt: &str,
    history: &[ChatMessage],
    temperature: f32,
) -> ChatCompletionRequest {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(ChatMessage::system(system_prompt));
    messages.extend_from_slice(history);

    ChatCompletionRequest {
        model: model.to_string(),
        messages,
        stream: true,
        temperature,
    }
}
