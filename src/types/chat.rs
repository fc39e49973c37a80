//! Chat-completion wire types.
//!
//! Only what a single vision request needs: one user message made of a text
//! part and an image part, and the reply's first choice.

use serde::{Deserialize, Serialize};

use crate::errors::AnalysisError;

/// Body of `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model ID.
    pub model: String,

    /// Conversation turns.
    pub messages: Vec<Message>,

    /// Completion token cap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Creates a request without a token cap.
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens: None,
        }
    }

    /// Sets the token cap.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Rejects requests the service would refuse anyway.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.model.is_empty() {
            return Err(AnalysisError::configuration("Model is required"));
        }
        if self.messages.is_empty() {
            return Err(AnalysisError::configuration(
                "At least one message is required",
            ));
        }
        if self.max_tokens == Some(0) {
            return Err(AnalysisError::configuration(
                "max_tokens must be greater than 0",
            ));
        }

        self.messages
            .iter()
            .enumerate()
            .try_for_each(|(i, message)| {
                message
                    .validate()
                    .map_err(|e| AnalysisError::configuration(format!("Message {}: {}", i, e)))
            })
    }
}

/// An outgoing message.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    /// Sender role.
    pub role: Role,

    /// Ordered multimodal parts.
    pub content: Vec<ContentPart>,
}

impl Message {
    /// A user turn with `text` followed by the image at `image_url`.
    pub fn user_with_image(text: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![
                ContentPart::Text { text: text.into() },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_url.into(),
                    },
                },
            ],
        }
    }

    fn validate(&self) -> Result<(), &'static str> {
        if self.content.is_empty() {
            return Err("content cannot be empty");
        }
        for part in &self.content {
            match part {
                ContentPart::Text { text } if text.is_empty() => {
                    return Err("text part cannot be empty")
                }
                ContentPart::ImageUrl { image_url } if image_url.url.is_empty() => {
                    return Err("image URL cannot be empty")
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person asking.
    User,
    /// The model.
    Assistant,
}

/// One part of a multimodal message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Plain text.
    Text {
        /// The text.
        text: String,
    },
    /// An image by URL or `data:` URI.
    ImageUrl {
        /// Where the image lives.
        image_url: ImageUrl,
    },
}

/// Image reference inside [`ContentPart::ImageUrl`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageUrl {
    /// HTTP URL or base64 `data:` URI.
    pub url: String,
}

/// Reply to a chat-completion request.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Completion ID.
    #[serde(default)]
    pub id: String,

    /// Model that answered, often a dated snapshot of the requested one.
    #[serde(default)]
    pub model: String,

    /// Candidate replies.
    pub choices: Vec<Choice>,

    /// Token accounting.
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatResponse {
    /// Text of the first choice.
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }

    /// Why the first choice stopped.
    pub fn finish_reason(&self) -> Option<FinishReason> {
        self.choices.first().and_then(|choice| choice.finish_reason)
    }
}

/// One candidate reply.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    /// Position among the choices.
    #[serde(default)]
    pub index: u32,

    /// The reply itself.
    pub message: AssistantMessage,

    /// Why generation stopped.
    #[serde(default)]
    pub finish_reason: Option<FinishReason>,
}

/// The model's reply message.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantMessage {
    /// Always the assistant.
    pub role: Role,

    /// Reply text; absent when a filter or refusal replaced it.
    pub content: Option<String>,
}

/// Why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural end.
    Stop,
    /// Hit `max_tokens`.
    Length,
    /// Wanted to call a tool.
    ToolCalls,
    /// Filtered.
    ContentFilter,
}

/// Token accounting.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Usage {
    /// Tokens in the prompt, image included.
    pub prompt_tokens: u32,
    /// Tokens in the reply.
    pub completion_tokens: u32,
    /// Sum of both.
    pub total_tokens: u32,
}
