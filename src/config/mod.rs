//! Configuration for the analyzer and its chat-completion client.
//!
//! Holds the API key, endpoint, model and token cap. Values come from the
//! builder or from the process environment.

use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use url::Url;

use crate::errors::{AnalysisError, IntentResult};

/// Default base URL for the chat-completion API.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default vision-capable model.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default cap on completion tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 500;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Configuration for the analyzer.
#[derive(Clone)]
pub struct AnalyzerConfig {
    /// API key for authentication (stored securely).
    pub(crate) api_key: SecretString,
    /// Base URL for API requests, without a trailing slash.
    pub base_url: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Maximum completion tokens.
    pub max_tokens: u32,
    /// Request timeout. `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
}

impl AnalyzerConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder::new()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENAI_API_KEY`: API key. A missing key is logged, not rejected;
    ///   the service refuses the request later.
    /// - `OPENAI_BASE_URL` (optional): Custom base URL
    /// - `SCREEN_INTENT_MODEL` (optional): Model identifier
    /// - `SCREEN_INTENT_MAX_TOKENS` (optional): Completion token cap
    /// - `OPENAI_TIMEOUT` (optional): Request timeout in seconds
    pub fn from_env() -> IntentResult<Self> {
        Self::builder_from_env().build()
    }

    /// Returns a builder pre-populated from the environment so callers can
    /// layer overrides on top.
    pub fn builder_from_env() -> AnalyzerConfigBuilder {
        let mut builder = AnalyzerConfigBuilder::new();

        match std::env::var(API_KEY_ENV) {
            Ok(api_key) => builder = builder.api_key(api_key),
            Err(_) => tracing::warn!("{} is not set; requests will be rejected", API_KEY_ENV),
        }

        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            builder = builder.base_url(base_url);
        }

        if let Ok(model) = std::env::var("SCREEN_INTENT_MODEL") {
            builder = builder.model(model);
        }

        if let Ok(value) = std::env::var("SCREEN_INTENT_MAX_TOKENS") {
            match value.parse::<u32>() {
                Ok(max_tokens) => builder = builder.max_tokens(max_tokens),
                Err(_) => tracing::warn!(value = %value, "Ignoring invalid SCREEN_INTENT_MAX_TOKENS"),
            }
        }

        if let Ok(value) = std::env::var("OPENAI_TIMEOUT") {
            match value.parse::<u64>() {
                Ok(secs) => builder = builder.timeout_secs(secs),
                Err(_) => tracing::warn!(value = %value, "Ignoring invalid OPENAI_TIMEOUT"),
            }
        }

        builder
    }

    /// Returns the API key (exposing the secret).
    pub(crate) fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Returns the API key hint (last 4 characters) for debugging.
    pub fn api_key_hint(&self) -> String {
        crate::auth::key_hint(self.api_key.expose_secret())
    }

    /// Returns the full URL for an endpoint.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl std::fmt::Debug for AnalyzerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzerConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Builder for [`AnalyzerConfig`].
#[derive(Default)]
pub struct AnalyzerConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    max_tokens: Option<u32>,
    timeout: Option<Duration>,
}

impl AnalyzerConfigBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the model identifier.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the completion token cap.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Some(Duration::from_secs(secs));
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> IntentResult<AnalyzerConfig> {
        let api_key = self.api_key.unwrap_or_default();
        if api_key.is_empty() {
            tracing::warn!("API key is empty; the service will reject the request");
        }

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let parsed = Url::parse(&base_url)?;
        match parsed.scheme() {
            "https" => {}
            "http" => tracing::warn!(base_url = %base_url, "Base URL is not using HTTPS"),
            other => {
                return Err(AnalysisError::configuration(format!(
                    "Unsupported base URL scheme: {}",
                    other
                )))
            }
        }

        let model = self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        if model.trim().is_empty() {
            return Err(AnalysisError::configuration("Model cannot be empty"));
        }

        let max_tokens = self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);
        if max_tokens == 0 {
            return Err(AnalysisError::configuration(
                "max_tokens must be greater than 0",
            ));
        }

        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(AnalysisError::configuration(
                "Timeout must be greater than 0",
            ));
        }

        Ok(AnalyzerConfig {
            api_key: SecretString::new(api_key),
            base_url,
            model,
            max_tokens,
            timeout: self.timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder_defaults() {
        let config = AnalyzerConfig::builder()
            .api_key("sk-test_key")
            .build()
            .unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_tokens, 500);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_config_builder_overrides() {
        let config = AnalyzerConfig::builder()
            .api_key("sk-test_key")
            .base_url("https://proxy.example.com/v1/")
            .model("gpt-4o-mini")
            .max_tokens(256)
            .timeout_secs(15)
            .build()
            .unwrap();

        assert_eq!(config.base_url, "https://proxy.example.com/v1");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_tokens, 256);
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_missing_api_key_is_not_fatal() {
        let config = AnalyzerConfig::builder().build().unwrap();
        assert_eq!(config.api_key(), "");
        assert_eq!(config.api_key_hint(), "****");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(AnalyzerConfig::builder().base_url("not a url").build().is_err());
        assert!(AnalyzerConfig::builder()
            .base_url("ftp://files.example.com")
            .build()
            .is_err());
    }

    #[test]
    fn test_plain_http_is_allowed() {
        let config = AnalyzerConfig::builder()
            .base_url("http://127.0.0.1:8080")
            .build()
            .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8080");
    }

    #[test]
    fn test_zero_max_tokens_rejected() {
        let result = AnalyzerConfig::builder().max_tokens(0).build();
        assert!(matches!(result, Err(AnalysisError::Configuration { .. })));
    }

    #[test]
    fn test_empty_model_rejected() {
        let result = AnalyzerConfig::builder().model("  ").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_endpoint_url() {
        let config = AnalyzerConfig::builder().build().unwrap();

        assert_eq!(
            config.endpoint_url("/chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_config_debug_redacts_api_key() {
        let config = AnalyzerConfig::builder()
            .api_key("sk-secret_key_9876")
            .build()
            .unwrap();

        let debug_str = format!("{:?}", config);
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("sk-secret_key"));
        assert_eq!(config.api_key_hint(), "...9876");
    }

    #[test]
    fn test_api_key_hint_with_non_ascii_key() {
        let config = AnalyzerConfig::builder()
            .api_key("sk-복사된키입니다")
            .build()
            .unwrap();

        assert_eq!(config.api_key_hint(), "...키입니다");
    }
}
