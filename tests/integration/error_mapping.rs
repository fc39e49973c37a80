//! HTTP failures surfaced through the analyzer.

use super::*;
use screen_intent::types::analysis::API_ERROR_PREFIX;
use screen_intent::{image, AnalysisError};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::Mock;

async fn mount(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

fn encoded_screenshot() -> image::EncodedImage {
    image::EncodedImage::from_bytes(&BASE64.decode(TINY_PNG_BASE64).unwrap())
}

#[tokio::test]
async fn test_unauthorized() {
    let server = MockServer::start().await;
    mount(&server, error_response(401, "Incorrect API key provided")).await;

    let err = analyzer_for(&server)
        .try_analyze(&encoded_screenshot())
        .await
        .unwrap_err();

    assert!(err.is_authentication_error());
    assert!(err.to_string().contains("Incorrect API key provided"));
}

#[tokio::test]
async fn test_unauthorized_collapses_to_error_shape() {
    let server = MockServer::start().await;
    mount(&server, error_response(401, "Incorrect API key provided")).await;

    let result = analyzer_for(&server).analyze(&encoded_screenshot()).await;

    assert_eq!(
        result.error(),
        Some(
            format!(
                "{}: Authentication failed: Incorrect API key provided",
                API_ERROR_PREFIX
            )
            .as_str()
        )
    );
}

#[tokio::test]
async fn test_rate_limited_is_not_retried() {
    let server = MockServer::start().await;
    mount(
        &server,
        error_response(429, "Rate limit reached for gpt-4o").insert_header("retry-after", "12"),
    )
    .await;

    let err = analyzer_for(&server)
        .try_analyze(&encoded_screenshot())
        .await
        .unwrap_err();

    assert!(matches!(err, AnalysisError::RateLimit { .. }));
    assert_eq!(err.retry_after(), Some(Duration::from_secs(12)));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_server_error() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(502).set_body_string("Bad Gateway")).await;

    let err = analyzer_for(&server)
        .try_analyze(&encoded_screenshot())
        .await
        .unwrap_err();

    if let AnalysisError::Server {
        status_code,
        message,
    } = err
    {
        assert_eq!(status_code, 502);
        assert_eq!(message, "Bad Gateway");
    } else {
        panic!("Expected Server error");
    }
}

#[tokio::test]
async fn test_timeout() {
    let server = MockServer::start().await;
    mount(
        &server,
        success_response("{\"current_action\": \"late\"}").set_delay(Duration::from_secs(3)),
    )
    .await;

    let config = AnalyzerConfig::builder()
        .api_key(TEST_API_KEY)
        .base_url(server.uri())
        .timeout_secs(1)
        .build()
        .unwrap();
    let analyzer = ImageIntentAnalyzer::from_config(&config).unwrap();

    let err = analyzer
        .try_analyze(&encoded_screenshot())
        .await
        .unwrap_err();

    assert!(matches!(err, AnalysisError::Timeout { .. }));
}

#[tokio::test]
async fn test_unreachable_service() {
    let config = AnalyzerConfig::builder()
        .api_key(TEST_API_KEY)
        .base_url("http://127.0.0.1:1")
        .build()
        .unwrap();
    let analyzer = ImageIntentAnalyzer::from_config(&config).unwrap();

    let err = analyzer
        .try_analyze(&encoded_screenshot())
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::Transport { .. }));

    let result = analyzer.analyze(&encoded_screenshot()).await;
    assert!(result.error().unwrap().starts_with(API_ERROR_PREFIX));
}
