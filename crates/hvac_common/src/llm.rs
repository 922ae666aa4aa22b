//! Text-generation backend abstraction.
//!
//! Generic interface for the LLM enhancement calls. Supports a real
//! OpenAI-compatible HTTP implementation and a fake client for testing.
//! The backend is an injected capability: the diagnosis engine never
//! decides on its own whether a backend exists.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Mutex;
use std::time::Duration;

/// LLM backend configuration, loaded as the `[llm]` section of the daemon
/// config. The API key itself never lives in the file, only the name of the
/// environment variable that holds it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key. `None` means the endpoint
    /// needs no key (a local server).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> Option<String> {
    Some("OPENAI_API_KEY".to_string())
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// LLM errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    #[error("text generation backend is disabled")]
    Disabled,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("backend returned an empty response")]
    EmptyResponse,
}

/// Text-generation capability required by the diagnosis engine.
///
/// One best-effort completion call: no retry, bounded output length. Every
/// failure mode surfaces as an `LlmError` and is treated identically by
/// callers (log-and-fallback for diagnosis, surface-as-error for follow-up).
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, LlmError>;
}

/// OpenAI-compatible HTTP backend. Works against any server exposing
/// `/chat/completions`, local or remote.
pub struct OpenAiBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiBackend {
    /// Build a backend from config. Returns `LlmError::Disabled` when the
    /// config has the backend switched off, and `LlmError::Config` when an
    /// API key is named but not present in the environment.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        if !config.enabled {
            return Err(LlmError::Disabled);
        }

        let api_key = match &config.api_key_env {
            Some(var) => match env::var(var) {
                Ok(key) if !key.is_empty() => Some(key),
                _ => {
                    return Err(LlmError::Config(format!(
                        "API key env var {} not set",
                        var
                    )));
                }
            },
            None => None,
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Http(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl TextGenerator for OpenAiBackend {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        tracing::debug!("generate: {} via {}", self.model, url);

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt}
            ],
            "max_tokens": max_tokens,
            "temperature": temperature
        });

        let mut request = self.client.post(&url).json(&body);
        if let Some(ref key) = self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request
            .send()
            .await
            .map_err(|e| LlmError::Http(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Http(format!("HTTP {}: {}", status, body)));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::Http(format!("failed to parse response: {}", e)))?;

        let text = json
            .get("choices")
            .and_then(|v| v.get(0))
            .and_then(|v| v.get("message"))
            .and_then(|v| v.get("content"))
            .and_then(|v| v.as_str())
            .ok_or(LlmError::EmptyResponse)?
            .trim()
            .to_string();

        if text.is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        Ok(text)
    }
}

/// Fake text generator for testing.
///
/// Returns pre-defined responses in order; the last one repeats once the
/// list runs down to a single entry. Counts calls so tests can assert how
/// many backend round-trips a path made.
pub struct FakeTextGenerator {
    responses: Mutex<Vec<Result<String, LlmError>>>,
    call_count: Mutex<usize>,
}

impl FakeTextGenerator {
    pub fn new(responses: Vec<Result<String, LlmError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            call_count: Mutex::new(0),
        }
    }

    /// A fake that always returns the given text
    pub fn always_text(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    /// A fake that always returns the given error
    pub fn always_error(error: LlmError) -> Self {
        Self::new(vec![Err(error)])
    }

    /// Number of generate calls made so far
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl TextGenerator for FakeTextGenerator {
    async fn generate(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
        _max_tokens: u32,
        _temperature: f32,
    ) -> Result<String, LlmError> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        if responses.len() == 1 {
            responses[0].clone()
        } else {
            responses.remove(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_config_default() {
        let config = LlmConfig::default();
        assert!(config.enabled);
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.api_key_env.as_deref(), Some("OPENAI_API_KEY"));
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_backend_disabled_in_config() {
        let config = LlmConfig {
            enabled: false,
            ..LlmConfig::default()
        };
        assert!(matches!(
            OpenAiBackend::from_config(&config),
            Err(LlmError::Disabled)
        ));
    }

    #[test]
    fn test_backend_missing_api_key() {
        let config = LlmConfig {
            api_key_env: Some("HVACD_TEST_KEY_THAT_DOES_NOT_EXIST".to_string()),
            ..LlmConfig::default()
        };
        assert!(matches!(
            OpenAiBackend::from_config(&config),
            Err(LlmError::Config(_))
        ));
    }

    #[test]
    fn test_backend_keyless_local_endpoint() {
        let config = LlmConfig {
            base_url: "http://127.0.0.1:11434/v1".to_string(),
            api_key_env: None,
            ..LlmConfig::default()
        };
        let backend = OpenAiBackend::from_config(&config).unwrap();
        assert!(backend.api_key.is_none());
    }

    #[tokio::test]
    async fn test_fake_always_text() {
        let fake = FakeTextGenerator::always_text("analysis");
        let first = fake.generate("sys", "user", 100, 0.3).await.unwrap();
        let second = fake.generate("sys", "user", 100, 0.3).await.unwrap();
        assert_eq!(first, "analysis");
        assert_eq!(second, "analysis");
        assert_eq!(fake.call_count(), 2);
    }

    #[tokio::test]
    async fn test_fake_always_error() {
        let fake = FakeTextGenerator::always_error(LlmError::Http("boom".to_string()));
        let result = fake.generate("sys", "user", 100, 0.3).await;
        assert!(matches!(result, Err(LlmError::Http(_))));
        assert_eq!(fake.call_count(), 1);
    }

    #[tokio::test]
    async fn test_fake_response_sequence() {
        let fake = FakeTextGenerator::new(vec![
            Err(LlmError::Http("first call fails".to_string())),
            Ok("second call succeeds".to_string()),
        ]);
        assert!(fake.generate("s", "u", 10, 0.0).await.is_err());
        assert_eq!(
            fake.generate("s", "u", 10, 0.0).await.unwrap(),
            "second call succeeds"
        );
    }
}
