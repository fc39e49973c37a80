//! Chat-completion client.
//!
//! [`ChatCompletionClient`] is the seam the analyzer depends on. The
//! production implementation, [`OpenAiChatClient`], sends exactly one
//! request per call over an [`HttpTransport`] and maps failures into
//! [`AnalysisError`] variants. There are no retries.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::instrument;

use crate::auth::{ApiKeyAuth, AuthProvider};
use crate::config::AnalyzerConfig;
use crate::errors::{AnalysisError, ApiErrorResponse, IntentResult};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, HttpTransportImpl};
use crate::types::chat::{ChatRequest, ChatResponse};

const CHAT_COMPLETIONS_PATH: &str = "chat/completions";

/// A service that answers chat-completion requests.
#[async_trait]
pub trait ChatCompletionClient: Send + Sync {
    /// Sends one chat-completion request and returns the parsed response.
    async fn complete(&self, request: ChatRequest) -> IntentResult<ChatResponse>;
}

/// Chat-completion client for OpenAI-compatible endpoints.
pub struct OpenAiChatClient {
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthProvider>,
    timeout: Option<Duration>,
}

impl OpenAiChatClient {
    /// Creates a new client builder.
    pub fn builder() -> OpenAiChatClientBuilder {
        OpenAiChatClientBuilder::new()
    }

    /// Creates a client with the default reqwest transport.
    pub fn from_config(config: &AnalyzerConfig) -> IntentResult<Self> {
        OpenAiChatClientBuilder::new().config(config.clone()).build()
    }

    /// Creates a client from explicit parts.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        auth: Arc<dyn AuthProvider>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            transport,
            auth,
            timeout,
        }
    }

    /// Builds an HTTP request from a chat request.
    fn build_request(&self, request: &ChatRequest) -> IntentResult<HttpRequest> {
        let body = serde_json::to_vec(request).map_err(|e| {
            AnalysisError::configuration(format!("Failed to serialize request: {}", e))
        })?;

        let mut http_request = HttpRequest::post(CHAT_COMPLETIONS_PATH, body)
            .with_header("Content-Type", "application/json");
        self.auth.apply_auth(&mut http_request.headers);

        if let Some(timeout) = self.timeout {
            http_request = http_request.with_timeout(timeout);
        }

        Ok(http_request)
    }

    /// Parses the HTTP response.
    fn parse_response(response: &HttpResponse) -> IntentResult<ChatResponse> {
        if !response.is_success() {
            return Err(Self::parse_error_response(response));
        }

        response.json().map_err(|e| {
            AnalysisError::malformed(format!("Failed to parse chat completion: {}", e))
        })
    }

    /// Maps a non-success response to an error, preferring the structured
    /// error body when the service sent one.
    fn parse_error_response(response: &HttpResponse) -> AnalysisError {
        let message = response
            .json::<ApiErrorResponse>()
            .map(|body| body.error.message)
            .unwrap_or_else(|_| {
                let text = response.text();
                if text.trim().is_empty() {
                    format!("HTTP {}", response.status)
                } else {
                    text
                }
            });

        match response.status {
            401 | 403 => AnalysisError::Authentication { message },
            429 => AnalysisError::RateLimit {
                message,
                retry_after: response.retry_after(),
            },
            500..=599 => AnalysisError::Server {
                status_code: response.status,
                message,
            },
            status_code => AnalysisError::Api {
                status_code,
                message,
            },
        }
    }
}

#[async_trait]
impl ChatCompletionClient for OpenAiChatClient {
    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn complete(&self, request: ChatRequest) -> IntentResult<ChatResponse> {
        request.validate()?;

        let http_request = self.build_request(&request)?;
        tracing::debug!(
            body_bytes = http_request.body.len(),
            "Sending chat completion request"
        );

        let started = Instant::now();
        let response = self.transport.send(http_request).await?;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match Self::parse_response(&response) {
            Ok(parsed) => {
                if let Some(usage) = &parsed.usage {
                    tracing::debug!(
                        elapsed_ms,
                        model = %parsed.model,
                        prompt_tokens = usage.prompt_tokens,
                        completion_tokens = usage.completion_tokens,
                        total_tokens = usage.total_tokens,
                        "Chat completion succeeded"
                    );
                } else {
                    tracing::debug!(elapsed_ms, model = %parsed.model, "Chat completion succeeded");
                }
                Ok(parsed)
            }
            Err(err) => {
                tracing::warn!(
                    elapsed_ms,
                    status = response.status,
                    retry_after_secs = err.retry_after().map(|d| d.as_secs()),
                    error = %crate::observability::redact(&err.to_string()),
                    "Chat completion failed"
                );
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for OpenAiChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiChatClient")
            .field("scheme", &self.auth.scheme())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Builder for [`OpenAiChatClient`].
#[derive(Default)]
pub struct OpenAiChatClientBuilder {
    config: Option<AnalyzerConfig>,
    transport: Option<Arc<dyn HttpTransport>>,
    auth: Option<Arc<dyn AuthProvider>>,
}

impl OpenAiChatClientBuilder {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn config(mut self, config: AnalyzerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets a custom transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets a custom auth provider.
    pub fn auth(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Builds the client.
    pub fn build(self) -> IntentResult<OpenAiChatClient> {
        let config = match self.config {
            Some(config) => config,
            None => AnalyzerConfig::builder().build()?,
        };

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                HttpTransportImpl::new(&config.base_url, config.timeout).map_err(|e| {
                    AnalysisError::configuration(format!("Failed to create transport: {}", e))
                })?,
            ),
        };

        let auth: Arc<dyn AuthProvider> = self
            .auth
            .unwrap_or_else(|| Arc::new(ApiKeyAuth::from_string(config.api_key())));
        auth.validate();

        tracing::debug!(
            endpoint = %config.endpoint_url(CHAT_COMPLETIONS_PATH),
            key_hint = %config.api_key_hint(),
            "Chat completion client ready"
        );

        Ok(OpenAiChatClient::new(transport, auth, config.timeout))
    }
}
