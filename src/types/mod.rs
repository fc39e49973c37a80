//! Type definitions for the chat-completion wire format and analysis results.

pub mod analysis;
pub mod chat;

pub use analysis::{ActionReport, AnalysisResult, API_ERROR_PREFIX, ENCODING_FAILED_MESSAGE};
pub use chat::{
    AssistantMessage, ChatRequest, ChatResponse, Choice, ContentPart, FinishReason, ImageUrl,
    Message, Role, Usage,
};
