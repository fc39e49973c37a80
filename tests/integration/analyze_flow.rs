//! End-to-end analysis against a mock server.

use super::*;
use pretty_assertions::assert_eq;
use screen_intent::types::analysis::{API_ERROR_PREFIX, ENCODING_FAILED_MESSAGE};
use screen_intent::{image, AnalysisResult, PROMPT};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::Mock;

const BROWSER_ACTION: &str = "사용자가 브라우저에서 문서를 작성하고 있습니다.";

#[tokio::test]
async fn test_screenshot_to_current_action() {
    let server = MockServer::start().await;
    let (_dir, screenshot) = write_screenshot();

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(success_response(&format!(
            "{{\"current_action\": \"{}\"}}",
            BROWSER_ACTION
        )))
        .expect(1)
        .mount(&server)
        .await;

    let result = analyzer_for(&server).analyze_path(&screenshot).await;

    assert_eq!(
        result,
        AnalysisResult::Success {
            current_action: BROWSER_ACTION.to_string()
        }
    );
    assert_eq!(
        result.to_pretty_json().unwrap(),
        format!("{{\n  \"current_action\": \"{}\"\n}}", BROWSER_ACTION)
    );
}

#[tokio::test]
async fn test_request_carries_prompt_image_and_limits() {
    let server = MockServer::start().await;
    let (_dir, screenshot) = write_screenshot();

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer sk-test-api-key"))
        .and(header("Content-Type", "application/json"))
        .and(body_partial_json(json!({"model": "gpt-4o", "max_tokens": 500})))
        .respond_with(success_response("{\"current_action\": \"ok\"}"))
        .expect(1)
        .mount(&server)
        .await;

    let result = analyzer_for(&server).analyze_path(&screenshot).await;
    assert!(result.is_success());

    let requests = server.received_requests().await.unwrap();
    let body: Value = requests[0].body_json().unwrap();

    assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    assert_eq!(body["messages"][0]["role"], "user");
    assert_eq!(
        body["messages"][0]["content"][0],
        json!({"type": "text", "text": PROMPT})
    );
    assert_eq!(
        body["messages"][0]["content"][1],
        json!({
            "type": "image_url",
            "image_url": {"url": format!("data:image/png;base64,{}", TINY_PNG_BASE64)}
        })
    );
}

#[tokio::test]
async fn test_fenced_reply_is_unwrapped() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(success_response(
            "```json\n{\"current_action\": \"설명\"}\n```",
        ))
        .mount(&server)
        .await;

    let encoded = image::EncodedImage::from_bytes(&BASE64.decode(TINY_PNG_BASE64).unwrap());
    let result = analyzer_for(&server).analyze(&encoded).await;

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({"current_action": "설명"})
    );
}

#[tokio::test]
async fn test_prose_reply_becomes_error() {
    let server = MockServer::start().await;
    let (_dir, screenshot) = write_screenshot();

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(success_response(
            "The user seems to be writing a document in a browser.",
        ))
        .mount(&server)
        .await;

    let result = analyzer_for(&server).analyze_path(&screenshot).await;

    let error = result.error().unwrap();
    assert!(error.starts_with(API_ERROR_PREFIX));
    assert!(error.contains("Malformed response"));
}

#[tokio::test]
async fn test_missing_screenshot_never_calls_service() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(success_response("{\"current_action\": \"unreachable\"}"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let result = analyzer_for(&server)
        .analyze_path(dir.path().join("test_image_2.png"))
        .await;

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({"error": ENCODING_FAILED_MESSAGE})
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_base_url_with_trailing_slash() {
    let server = MockServer::start().await;
    let (_dir, screenshot) = write_screenshot();

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(success_response("{\"current_action\": \"ok\"}"))
        .expect(1)
        .mount(&server)
        .await;

    let config = AnalyzerConfig::builder()
        .api_key(TEST_API_KEY)
        .base_url(format!("{}/v1/", server.uri()))
        .build()
        .unwrap();
    let analyzer = ImageIntentAnalyzer::from_config(&config).unwrap();

    let result = analyzer.analyze_path(&screenshot).await;
    assert_eq!(result.current_action(), Some("ok"));
}
