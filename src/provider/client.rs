//! Chat client: request building plus the streaming decode loop.

use super::decoder::drain_stream;
use super::error::Error;
use super::http::HttpClient;
use super::request::build_request;
use super::types::{ChatMessage, StreamEvent};
use crate::config::Config;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Client for one chat-completions endpoint.
///
/// Cheap to clone; the underlying HTTP connection pool is shared.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: Arc<HttpClient>,
    model: String,
    temperature: f32,
}

impl ChatClient {
    /// Build a client from injected configuration.
    ///
    /// Fails when no credential is configured; everything else is taken
    /// as-is from the config.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let api_key = config.api_key()?;
        let http = HttpClient::new(
            config.base_url.as_str(),
            api_key,
            config.referer.as_str(),
            config.title.as_str(),
        );

        Ok(Self {
            http: Arc::new(http),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    /// Send one chat request and stream the assistant's reply.
    ///
    /// `system_prompt` is synthesized into a single leading system message;
    /// `history` is the full ordered conversation ending with the new user
    /// turn. Fragments go to `tx` as they decode; the full accumulated text
    /// is returned on clean completion.
    pub async fn stream(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        tx: &mpsc::Sender<StreamEvent>,
    ) -> Result<String, Error> {
        let request = build_request(&self.model, system_prompt, history, self.temperature);

        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "chat completion request"
        );

        let stream = self.http.post_stream("/chat/completions", &request).await?;
        let text = drain_stream(stream, tx).await?;

        tracing::debug!(chars = text.len(), "assistant turn complete");
        Ok(text)
    }
}
