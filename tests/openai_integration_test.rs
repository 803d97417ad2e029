//! Wiremock integration tests for OpenAiClient.
//!
//! These tests verify the Responses API request shape, response parsing and
//! error mapping using mocked responses.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use prodscan::content::PromptSource;
use prodscan::providers::{OpenAiClient, VisionProvider};
use prodscan::{AnalyzeRequest, ContentPart, ContentPayload, Scanner, ScannerError};

fn payload() -> ContentPayload {
    ContentPayload::new(vec![
        ContentPart::image("https://x.test/cream.jpg"),
        ContentPart::text("Identify the product."),
    ])
}

fn output_body(text: &str) -> serde_json::Value {
    json!({
        "id": "resp_123",
        "object": "response",
        "output": [
            {"type": "reasoning", "summary": []},
            {
                "type": "message",
                "role": "assistant",
                "content": [{"type": "output_text", "text": text, "annotations": []}]
            }
        ],
        "usage": {"input_tokens": 1234, "output_tokens": 567, "total_tokens": 1801}
    })
}

/// Test successful response with usage.
#[tokio::test]
async fn test_complete_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/responses"))
        .and(header("Authorization", "Bearer test_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(output_body("{\"brand\": \"Acme\"}")))
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::with_base_url("test_key", mock_server.uri()).unwrap();
    let output = client.complete(&payload(), "gpt-5").await.expect("should succeed");

    assert_eq!(output.text, "{\"brand\": \"Acme\"}");
    assert_eq!(output.usage.input_tokens, 1234);
    assert_eq!(output.usage.output_tokens, 567);
    assert_eq!(client.name(), "openai");
}

/// Test the request carries the model and both content parts in order.
#[tokio::test]
async fn test_request_shape() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/responses"))
        .and(body_partial_json(json!({
            "model": "gpt-5",
            "input": [{
                "role": "user",
                "content": [
                    {"type": "input_image", "image_url": "https://x.test/cream.jpg"},
                    {"type": "input_text", "text": "Identify the product."}
                ]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(output_body("{}")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::with_base_url("test_key", mock_server.uri()).unwrap();
    client.complete(&payload(), "gpt-5").await.expect("should succeed");
}

/// Test a trailing slash on the base URL is tolerated.
#[tokio::test]
async fn test_base_url_trailing_slash() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/responses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(output_body("{}")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client =
        OpenAiClient::with_base_url("test_key", format!("{}/", mock_server.uri())).unwrap();
    assert!(client.complete(&payload(), "gpt-5").await.is_ok());
}

/// Test multiple output_text parts are concatenated.
#[tokio::test]
async fn test_output_text_concatenated() {
    let mock_server = MockServer::start().await;

    let body = json!({
        "output": [{
            "type": "message",
            "content": [
                {"type": "output_text", "text": "{\"a\": "},
                {"type": "refusal", "refusal": "no"},
                {"type": "output_text", "text": "1}"}
            ]
        }]
    });

    Mock::given(method("POST"))
        .and(path("/responses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::with_base_url("test_key", mock_server.uri()).unwrap();
    let output = client.complete(&payload(), "gpt-5").await.unwrap();

    assert_eq!(output.text, "{\"a\": 1}");
    // Missing usage block reads as zero.
    assert_eq!(output.usage.input_tokens, 0);
    assert_eq!(output.usage.output_tokens, 0);
}

/// Test empty output maps to EmptyResponse.
#[tokio::test]
async fn test_empty_output() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/responses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"output": []})))
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::with_base_url("test_key", mock_server.uri()).unwrap();
    let result = client.complete(&payload(), "gpt-5").await;

    assert!(matches!(result, Err(ScannerError::EmptyResponse)));
}

/// Test 401 maps to AuthenticationFailed.
#[tokio::test]
async fn test_auth_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/responses"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::with_base_url("bad_key", mock_server.uri()).unwrap();
    let result = client.complete(&payload(), "gpt-5").await;

    assert!(matches!(result, Err(ScannerError::AuthenticationFailed)));
}

/// Test 404 maps to ModelNotFound.
#[tokio::test]
async fn test_model_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/responses"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::with_base_url("test_key", mock_server.uri()).unwrap();
    let result = client.complete(&payload(), "gpt-nonexistent").await;

    match result {
        Err(ScannerError::ModelNotFound(model)) => assert_eq!(model, "gpt-nonexistent"),
        other => panic!("expected ModelNotFound, got {other:?}"),
    }
}

/// Test 429 maps to RateLimited with retry-after.
#[tokio::test]
async fn test_rate_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/responses"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::with_base_url("test_key", mock_server.uri()).unwrap();
    let result = client.complete(&payload(), "gpt-5").await;

    match result {
        Err(ScannerError::RateLimited { retry_after }) => {
            assert_eq!(retry_after, Some(std::time::Duration::from_secs(30)));
        }
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

/// Test server errors carry the API's own message.
#[tokio::test]
async fn test_server_error_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/responses"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"message": "Invalid image URL", "type": "invalid_request_error"}
        })))
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::with_base_url("test_key", mock_server.uri()).unwrap();
    let result = client.complete(&payload(), "gpt-5").await;

    match result {
        Err(ScannerError::Api { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "Invalid image URL");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

/// Test server errors without a JSON body fall back to the status.
#[tokio::test]
async fn test_server_error_plain_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/responses"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream overloaded"))
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::with_base_url("test_key", mock_server.uri()).unwrap();
    let result = client.complete(&payload(), "gpt-5").await;

    match result {
        Err(ScannerError::Api { status, message }) => {
            assert_eq!(status, 503);
            assert!(message.contains("503"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

/// Test the full pipeline against a mocked API: fenced output is parsed,
/// and the second identical request is served from the disk cache.
#[tokio::test]
async fn test_scanner_over_openai() {
    let mock_server = MockServer::start().await;
    let tmp = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/responses"))
        .and(header("Authorization", "Bearer test_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(output_body(
            "```json\n{\"product_name\": \"Hydrating Cream\", \"confidence\": \"high\"}\n```",
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let scanner = Scanner::builder()
        .openai("test_key")
        .base_url(mock_server.uri())
        .cache_dir(tmp.path())
        .prompt(PromptSource::inline("Identify the product."))
        .build()
        .unwrap();

    for _ in 0..2 {
        let response = scanner
            .analyze(AnalyzeRequest::url("https://x.test/cream.jpg"))
            .await
            .expect("analyze should succeed");
        assert_eq!(response.data["product_name"], "Hydrating Cream");
        assert_eq!(response.usage.input_tokens, 1234);
        assert!((response.estimated_cost_usd - 0.012207).abs() < 1e-9);
        assert!(!response.schema_errors.is_empty());
    }
}
