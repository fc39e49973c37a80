//! Screen intent analysis.
//!
//! [`ImageIntentAnalyzer`] sends one screenshot plus a fixed prompt to a
//! chat-completion service and turns the reply into an [`AnalysisResult`].
//! Every failure ends up as an `{"error": ...}` value; nothing is retried.

mod prompt;
mod response;

pub use prompt::PROMPT;
pub use response::{parse_action_report, strip_code_fence};

use std::path::Path;
use std::sync::Arc;
use tracing::instrument;

use crate::client::{ChatCompletionClient, OpenAiChatClient};
use crate::config::AnalyzerConfig;
use crate::errors::{AnalysisError, IntentResult};
use crate::image::{self, EncodedImage};
use crate::observability::redact;
use crate::types::analysis::{ActionReport, AnalysisResult};
use crate::types::chat::{ChatRequest, Message};

/// Infers what a user is doing from a screenshot.
#[derive(Clone)]
pub struct ImageIntentAnalyzer {
    client: Arc<dyn ChatCompletionClient>,
    model: String,
    max_tokens: u32,
}

impl ImageIntentAnalyzer {
    /// Creates an analyzer around an existing client.
    pub fn new(
        client: Arc<dyn ChatCompletionClient>,
        model: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            max_tokens,
        }
    }

    /// Creates an analyzer backed by an [`OpenAiChatClient`].
    pub fn from_config(config: &AnalyzerConfig) -> IntentResult<Self> {
        let client = OpenAiChatClient::from_config(config)?;
        Ok(Self::with_client(Arc::new(client), config))
    }

    /// Creates an analyzer using `client` and the model settings of `config`.
    pub fn with_client(client: Arc<dyn ChatCompletionClient>, config: &AnalyzerConfig) -> Self {
        Self::new(client, config.model.clone(), config.max_tokens)
    }

    /// Returns the model identifier sent with each request.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the completion token cap.
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Builds the chat request for an encoded screenshot.
    pub fn build_request(&self, image: &EncodedImage) -> ChatRequest {
        ChatRequest::new(
            self.model.clone(),
            vec![Message::user_with_image(PROMPT, image.data_url())],
        )
        .with_max_tokens(self.max_tokens)
    }

    /// Analyzes an encoded screenshot, keeping failures distinct.
    #[instrument(skip_all, fields(model = %self.model, base64_len = image.len()))]
    pub async fn try_analyze(&self, image: &EncodedImage) -> IntentResult<ActionReport> {
        if image.is_empty() {
            return Err(AnalysisError::EncodingFailed);
        }

        let response = self.client.complete(self.build_request(image)).await?;

        let reply = response.content().ok_or_else(|| {
            AnalysisError::malformed(match response.finish_reason() {
                Some(reason) => format!("Reply has no text content (finish reason {:?})", reason),
                None => "Reply has no text content".to_string(),
            })
        })?;
        tracing::debug!(reply_len = reply.len(), "Received model reply");

        parse_action_report(reply)
    }

    /// Analyzes an encoded screenshot.
    pub async fn analyze(&self, image: &EncodedImage) -> AnalysisResult {
        let result = self.try_analyze(image).await;
        if let Err(err) = &result {
            tracing::warn!(
                error = %redact(&err.to_string()),
                local = err.is_local(),
                "Analysis failed"
            );
        }
        result.into()
    }

    /// Analyzes the output of [`image::encode`].
    ///
    /// `None` short-circuits to the encoding failure without a network call.
    pub async fn analyze_encoded(&self, image: Option<EncodedImage>) -> AnalysisResult {
        match image {
            Some(image) => self.analyze(&image).await,
            None => AnalysisResult::from_error(&AnalysisError::EncodingFailed),
        }
    }

    /// Encodes the file at `path` and analyzes it.
    pub async fn analyze_path(&self, path: impl AsRef<Path>) -> AnalysisResult {
        self.analyze_encoded(image::encode(path)).await
    }
}

impl std::fmt::Debug for ImageIntentAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageIntentAnalyzer")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}
