//! HTTP wrapper for the chat-completions endpoint.

use crate::provider::error::{Error, extract_error_message};
use bytes::Bytes;
use futures::Stream;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use std::time::Duration;

/// HTTP request timeout. Covers the whole response, so it is generous:
/// a streamed completion can legitimately run for minutes.
const TIMEOUT: Duration = Duration::from_secs(300);
/// Connection timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client carrying the bearer credential and the OpenRouter
/// attribution headers (`HTTP-Referer`, `X-Title`).
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    bearer_token: String,
    referer: String,
    title: String,
}

impl HttpClient {
    pub fn new(
        base_url: impl Into<String>,
        bearer_token: impl Into<String>,
        referer: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.into(),
            bearer_token: bearer_token.into(),
            referer: referer.into(),
            title: title.into(),
        }
    }

    fn build_headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let auth = HeaderValue::from_str(&format!("Bearer {}", self.bearer_token))
            .map_err(|_| Error::Config("API key contains invalid header characters".into()))?;
        headers.insert(AUTHORIZATION, auth);

        let referer = HeaderValue::from_str(&self.referer)
            .map_err(|_| Error::Config("Referer contains invalid header characters".into()))?;
        headers.insert(HeaderName::from_static("http-referer"), referer);

        let title = HeaderValue::from_str(&self.title)
            .map_err(|_| Error::Config("Title contains invalid header characters".into()))?;
        headers.insert(HeaderName::from_static("x-title"), title);

        Ok(headers)
    }

    /// POST a JSON body and return the open streaming response body.
    ///
    /// Error statuses are mapped before any body stream is handed out:
    /// 402 means the free-tier quota is gone, any other non-2xx becomes
    /// [`Error::Upstream`] with the status code and whatever message the
    /// body carried.
    pub async fn post_stream<T: Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<impl Stream<Item = Result<Bytes, reqwest::Error>>, Error> {
        let url = format!("{}{path}", self.base_url);
        let headers = self.build_headers()?;

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_error_status(status, response.text().await.ok()));
        }

        Ok(response.bytes_stream())
    }
}

/// Map a non-2xx response to the provider error taxonomy.
fn map_error_status(status: StatusCode, body: Option<String>) -> Error {
    if status == StatusCode::PAYMENT_REQUIRED {
        return Error::QuotaExceeded;
    }

    let status_text = status.canonical_reason().unwrap_or("Unknown");
    let message = extract_error_message(body.as_deref().unwrap_or(""), status_text);
    Error::Upstream {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_include_auth_and_attribution() {
        let client = HttpClient::new(
            "https://openrouter.ai/api/v1",
            "test-token",
            "http://localhost",
            "Bookstore Chatbot",
        );
        let headers = client.build_headers().unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer test-token");
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(headers.get("HTTP-Referer").unwrap(), "http://localhost");
        assert_eq!(headers.get("X-Title").unwrap(), "Bookstore Chatbot");
    }

    #[test]
    fn test_invalid_token_rejected() {
        let client = HttpClient::new("https://x", "bad\ntoken", "http://localhost", "t");
        assert!(matches!(
            client.build_headers(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_402_maps_to_quota_exceeded() {
        let err = map_error_status(StatusCode::PAYMENT_REQUIRED, Some("ignored".into()));
        assert!(matches!(err, Error::QuotaExceeded));
    }

    #[test]
    fn test_500_maps_to_upstream_with_status() {
        let err = map_error_status(StatusCode::INTERNAL_SERVER_ERROR, None);
        match err {
            Error::Upstream { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Internal Server Error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport() {
        // Nothing listens on the discard port; the request fails before
        // any response headers exist.
        let client = HttpClient::new("http://127.0.0.1:9", "k", "http://localhost", "t");
        match client
            .post_stream("/chat/completions", &serde_json::json!({}))
            .await
        {
            Ok(_) => panic!("expected transport error"),
            Err(e) => assert!(matches!(e, Error::Transport(_))),
        }
    }

    #[test]
    fn test_error_body_message_extracted() {
        let body = r#"{"error":{"message":"model not found"}}"#;
        let err = map_error_status(StatusCode::NOT_FOUND, Some(body.into()));
        match err {
            Error::Upstream { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "model not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
