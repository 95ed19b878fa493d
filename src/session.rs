//! Conversation state: ordered history, the one-in-flight send gate, and
//! diagnostic rendering for failed turns.

use crate::config::Config;
use crate::provider::{self, ChatClient, ChatMessage, StreamEvent};
use tokio::sync::mpsc;

/// What happened to a [`Conversation::send`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Assistant turn streamed and recorded.
    Completed,
    /// The request failed; a diagnostic turn was recorded instead.
    Failed,
    /// Input was empty after trimming, or a send was already in flight.
    Ignored,
}

/// One ongoing conversation.
///
/// The system prompt is synthesized into each request and never stored in
/// the history; the canned greeting seeds the history as a plain assistant
/// turn, exactly like any later reply.
pub struct Conversation {
    client: ChatClient,
    system_prompt: String,
    history: Vec<ChatMessage>,
    sending: bool,
}

impl Conversation {
    pub fn new(client: ChatClient, config: &Config) -> Self {
        let mut history = Vec::new();
        if !config.greeting.is_empty() {
            history.push(ChatMessage::assistant(config.greeting.clone()));
        }

        Self {
            client,
            system_prompt: config.system_prompt.clone(),
            history,
            sending: false,
        }
    }

    /// Full ordered history, including greeting and diagnostic turns.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Whether a send is currently in flight.
    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Send one user turn and stream the reply into `tx`.
    ///
    /// Blank input is ignored, as is any call made while a previous send is
    /// still streaming (no queuing, no cancellation). Errors are terminal
    /// for the turn: the history gets a `⚠️`-prefixed diagnostic in place
    /// of the assistant's reply, and prior turns stay untouched.
    pub async fn send(
        &mut self,
        input: &str,
        tx: &mpsc::Sender<StreamEvent>,
    ) -> SendOutcome {
        let Some(text) = accept_input(input, self.sending) else {
            return SendOutcome::Ignored;
        };

        self.sending = true;
        self.history.push(ChatMessage::user(text));

        let result = self
            .client
            .stream(&self.system_prompt, &self.history, tx)
            .await;
        self.sending = false;

        self.record_outcome(result)
    }

    fn record_outcome(&mut self, result: Result<String, provider::Error>) -> SendOutcome {
        match result {
            Ok(text) => {
                self.history.push(ChatMessage::assistant(text));
                SendOutcome::Completed
            }
            Err(e) => {
                tracing::warn!(error = %e, "chat request failed");
                self.history.push(ChatMessage::assistant(diagnostic(&e)));
                SendOutcome::Failed
            }
        }
    }
}

/// Trim the input and apply the send gate.
fn accept_input(input: &str, sending: bool) -> Option<String> {
    let text = input.trim();
    if text.is_empty() || sending {
        return None;
    }
    Some(text.to_string())
}

/// Render a terminal error as a user-visible diagnostic turn, prefixed so
/// it cannot be mistaken for model output.
fn diagnostic(error: &provider::Error) -> String {
    format!("⚠️ API request failed: {error}")
}
