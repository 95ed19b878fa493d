//! Streaming chat-completions provider.
//!
//! Two halves: the request builder assembles and posts the completion
//! request; the stream decoder turns the response body into ordered text
//! fragments delivered to a caller-supplied sink.

mod client;
mod decoder;
mod error;
mod http;
mod request;
mod stream;
mod types;

pub use client::ChatClient;
pub use decoder::StreamDecoder;
pub use error::Error;
pub use types::{ChatMessage, Role, StreamEvent};
