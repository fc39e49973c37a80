//! Screen intent analysis.
//!
//! Infers what a user is doing from a screenshot. The image is base64
//! encoded, sent with a fixed instruction to a multimodal chat-completion
//! API, and the model's JSON reply is returned as either
//! `{"current_action": ...}` or `{"error": ...}`.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use screen_intent::{AnalyzerConfig, ImageIntentAnalyzer};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AnalyzerConfig::builder()
//!         .api_key("sk-your-api-key")
//!         .build()?;
//!     let analyzer = ImageIntentAnalyzer::from_config(&config)?;
//!
//!     let result = analyzer.analyze_path("screenshot.png").await;
//!     println!("{}", result.to_pretty_json()?);
//!     Ok(())
//! }
//! ```
//!
//! # Keeping failures apart
//!
//! [`ImageIntentAnalyzer::analyze`] folds every failure into the error shape.
//! [`ImageIntentAnalyzer::try_analyze`] returns the underlying
//! [`AnalysisError`] instead:
//!
//! ```rust,no_run
//! use screen_intent::{image, AnalysisError, AnalyzerConfig, ImageIntentAnalyzer};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let analyzer = ImageIntentAnalyzer::from_config(&AnalyzerConfig::from_env()?)?;
//! let encoded = image::try_encode("screenshot.png")?;
//!
//! match analyzer.try_analyze(&encoded).await {
//!     Ok(report) => println!("{}", report.current_action),
//!     Err(AnalysisError::RateLimit { retry_after, .. }) => {
//!         eprintln!("rate limited, retry after {:?}", retry_after)
//!     }
//!     Err(err) => eprintln!("{}", err),
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod analyzer;
pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod image;
pub mod observability;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use analyzer::{ImageIntentAnalyzer, PROMPT};
pub use client::{ChatCompletionClient, OpenAiChatClient, OpenAiChatClientBuilder};
pub use config::{AnalyzerConfig, AnalyzerConfigBuilder};
pub use errors::{AnalysisError, IntentResult};
pub use image::EncodedImage;

// Type re-exports
pub use types::analysis::{ActionReport, AnalysisResult};
pub use types::chat::{ChatRequest, ChatResponse, Message};

/// Mock implementations for testing.
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
