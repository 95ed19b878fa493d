//! Injected configuration: endpoint, model, credential, attribution.
//!
//! Loaded from `config.toml` under the user config dir; every field has a
//! default so a missing file still yields a working setup (minus the API
//! key, which comes from the file or the environment and is never embedded
//! in source).

use crate::provider;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment fallback for the credential.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_MODEL: &str = "deepseek/deepseek-r1-0528:free";

const DEFAULT_SYSTEM_PROMPT: &str = r#"You are "Z Bookstore Assistant" for an online bookstore.
You only answer questions related to this bookstore: books, authors, prices, stock, orders, shipping, categories, grade, and subject.
Be concise. If you don't know, say so.
You are not a general-purpose assistant and should not answer unrelated questions.
You are not a human, so do not use phrases like "as an AI" or "as a chatbot".
You are not a search engine, so do not provide search results or links.
You are not a customer support agent, so do not handle issues like refunds or complaints.
You are a friendly and helpful assistant focused on providing information about the bookstore.
Our bookstore has the following features:
- Books are categorized by grade and subject.
- Book categories include: Exercise, Question Books, Answer Books, and Stationery.
- Subjects include: Writing, Myanmar, English, Mathematics, Pencil Control, Science, Spelling, Thet Pont, Social, Moral, Geology & History, Mathematics Skill, Time, Multiply, Grammer.
- Grades include: KG to Grade 7.
- Question books prices are 12000 Kyats.
- Answer books prices are 3000 Kyats.
- We offer home delivery, Royal Express pick-up, and car gate pick-up.
- Home delivery requires State/Region, Township, and Full Address.
- Royal Express pick-up requires State/Region and Township.
- Car gate pick-up requires State/Region and Township.

Language:
- Always respond in English."#;

const DEFAULT_GREETING: &str = "Hello! I am Z Bookstore Chatbot. Ask me anything about the \
                                bookstore: titles, prices, shipping, grades, subjects, etc.";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bearer credential. Falls back to `OPENROUTER_API_KEY` when unset.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// Origin-identifying `HTTP-Referer` header value.
    pub referer: String,
    /// `X-Title` header value.
    pub title: String,
    pub temperature: f32,
    pub system_prompt: String,
    /// Canned assistant greeting shown before the first user turn.
    pub greeting: String,
    /// Suggested questions offered by the front end.
    pub suggestions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            referer: "http://localhost".to_string(),
            title: "Bookstore Chatbot".to_string(),
            temperature: 0.2,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            greeting: DEFAULT_GREETING.to_string(),
            suggestions: vec![
                "Which subjects are available in school books?".to_string(),
                "What is the shipping cost for home delivery?".to_string(),
                "Do you have a Grade 9 Chemistry book?".to_string(),
                "Which townships support Royal Express pick-up?".to_string(),
            ],
        }
    }
}

impl Config {
    /// Load configuration, preferring an explicit path over the default
    /// location. A missing default file yields `Config::default()`; a
    /// missing explicit path is an error.
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_path(), false),
        };

        if !path.exists() {
            if required {
                return Err(crate::Error::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("{}: {e}", path.display())))?;
        Ok(config)
    }

    /// Default config file location.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("bookchat").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".bookchat/config.toml"))
    }

    /// Resolve the credential from config or environment.
    pub fn api_key(&self) -> Result<String, provider::Error> {
        resolve_api_key(self.api_key.as_deref(), std::env::var(API_KEY_ENV).ok())
    }
}

fn resolve_api_key(
    configured: Option<&str>,
    from_env: Option<String>,
) -> Result<String, provider::Error> {
    configured
        .map(str::to_string)
        .or(from_env)
        .filter(|k| !k.trim().is_empty())
        .ok_or(provider::Error::MissingApiKey {
            env_var: API_KEY_ENV,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.base_url, "https://openrouter.ai/api/v1");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.temperature, 0.2);
        assert!(config.api_key.is_none());
        assert_eq!(config.suggestions.len(), 4);
        assert!(config.system_prompt.contains("Z Bookstore Assistant"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_key = \"sk-or-test\"\nmodel = \"meta-llama/llama-3-8b\"").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-or-test"));
        assert_eq!(config.model, "meta-llama/llama-3-8b");
        // Unspecified fields keep their defaults.
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.title, "Bookstore Chatbot");
    }

    #[test]
    fn test_explicit_missing_path_errors() {
        let err = Config::load(Some(Path::new("/nonexistent/config.toml"))).unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_invalid_toml_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "model = [not toml").unwrap();
        assert!(Config::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_api_key_prefers_config_over_env() {
        let key = resolve_api_key(Some("from-config"), Some("from-env".into())).unwrap();
        assert_eq!(key, "from-config");
    }

    #[test]
    fn test_api_key_env_fallback() {
        let key = resolve_api_key(None, Some("from-env".into())).unwrap();
        assert_eq!(key, "from-env");
    }

    #[test]
    fn test_api_key_missing() {
        let err = resolve_api_key(None, None).unwrap_err();
        assert!(matches!(err, provider::Error::MissingApiKey { .. }));
    }

    #[test]
    fn test_blank_key_treated_as_missing() {
        assert!(resolve_api_key(Some("  "), None).is_err());
    }
}
