//! Provider error taxonomy.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// HTTP 402 from the upstream: the free-tier quota is exhausted.
    #[error("Your free plan quota is exceeded.")]
    QuotaExceeded,

    /// Any other non-2xx response, with whatever the body said.
    #[error("OpenRouter error: {status} {message}")]
    Upstream { status: u16, message: String },

    /// Network-level failure: connection refused, timeout, aborted body read.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A `data:` payload inside an otherwise well-formed frame was not JSON.
    #[error("Malformed stream frame: {0}")]
    MalformedFrame(String),

    /// No credential configured for the request.
    #[error("Missing API key. Set {env_var} or add api_key to config.toml")]
    MissingApiKey { env_var: &'static str },

    /// A configured value cannot be used (e.g. not valid in an HTTP header).
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Transport(e.to_string())
    }
}

/// Extract a human-readable message from an error response body.
///
/// Upstreams wrap failures in a few shapes:
/// - `{"error": {"message": "...", "code": ...}}`
/// - `{"error": "..."}`
/// - `{"message": "..."}`
///
/// Falls back to the raw body (or the status text when the body is empty).
pub(crate) fn extract_error_message(body: &str, status_text: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(error_obj) = json.get("error") {
            if let Some(msg) = error_obj.get("message").and_then(|v| v.as_str()) {
                return msg.to_string();
            }
            if let Some(msg) = error_obj.as_str() {
                return msg.to_string();
            }
        }
        if let Some(msg) = json.get("message").and_then(|v| v.as_str()) {
            return msg.to_string();
        }
    }

    let body = body.trim();
    if body.is_empty() {
        status_text.to_string()
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_nested_message() {
        let body = r#"{"error":{"message":"Provider returned error","code":502}}"#;
        assert_eq!(
            extract_error_message(body, "Bad Gateway"),
            "Provider returned error"
        );
    }

    #[test]
    fn test_extract_error_string() {
        assert_eq!(
            extract_error_message(r#"{"error":"Invalid API key"}"#, "Unauthorized"),
            "Invalid API key"
        );
    }

    #[test]
    fn test_extract_top_level_message() {
        assert_eq!(
            extract_error_message(r#"{"message":"Something went wrong"}"#, ""),
            "Something went wrong"
        );
    }

    #[test]
    fn test_plain_text_body_kept() {
        assert_eq!(
            extract_error_message("upstream exploded", "Internal Server Error"),
            "upstream exploded"
        );
    }

    #[test]
    fn test_empty_body_uses_status_text() {
        assert_eq!(
            extract_error_message("", "Internal Server Error"),
            "Internal Server Error"
        );
    }

    #[test]
    fn test_quota_display() {
        assert_eq!(
            Error::QuotaExceeded.to_string(),
            "Your free plan quota is exceeded."
        );
    }

    #[test]
    fn test_upstream_display_carries_status() {
        let e = Error::Upstream {
            status: 500,
            message: "oops".into(),
        };
        assert_eq!(e.to_string(), "OpenRouter error: 500 oops");
    }
}
