//! Integration tests using WireMock
//!
//! These run the analyzer against a mock chat-completion server, covering the
//! full path from screenshot on disk to the printed result shape.

mod analyze_flow;
mod error_mapping;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use screen_intent::{AnalyzerConfig, ImageIntentAnalyzer};
use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::{MockServer, ResponseTemplate};

/// A valid 10x10 white RGB PNG.
pub const TINY_PNG_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAoAAAAKCAIAAAACUFjqAAAAEElEQVR42mP4jxcwjEpjAwD6Hirkf4B3HgAAAABJRU5ErkJggg==";

pub const TEST_API_KEY: &str = "sk-test-api-key";

/// Writes the 10x10 PNG as `screenshot.png` in a fresh temp dir.
pub fn write_screenshot() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("screenshot.png");
    std::fs::write(&path, BASE64.decode(TINY_PNG_BASE64).unwrap()).unwrap();
    (dir, path)
}

pub fn config_for(server: &MockServer) -> AnalyzerConfig {
    AnalyzerConfig::builder()
        .api_key(TEST_API_KEY)
        .base_url(server.uri())
        .build()
        .unwrap()
}

pub fn analyzer_for(server: &MockServer) -> ImageIntentAnalyzer {
    ImageIntentAnalyzer::from_config(&config_for(server)).unwrap()
}

/// Chat completion body whose single choice carries `content`.
pub fn completion_body(content: &str) -> Value {
    json!({
        "id": "chatcmpl-integration-123",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "gpt-4o-2024-08-06",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 812, "completion_tokens": 46, "total_tokens": 858}
    })
}

pub fn success_response(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(completion_body(content))
}

pub fn error_response(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "error": {
            "message": message,
            "type": "invalid_request_error",
            "code": null
        }
    }))
}
