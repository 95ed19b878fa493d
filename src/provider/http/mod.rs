//! Shared HTTP utilities for the chat provider.

mod client;
mod sse;

pub use client::HttpClient;
pub use sse::{SseFrame, SseParser};
