//! Integration Tests for the HTTP Transport and Handler
//!
//! UNIT UNDER TEST: HttpTransport and OpenAICompatibleHandler over real HTTP
//!
//! BUSINESS RESPONSIBILITY:
//!   - POST chat completion requests with bearer auth to `{base_url}/chat/completions`
//!   - Parse SSE bodies into normalized events
//!   - Map provider HTTP failures onto typed errors without retrying
//!
//! TEST COVERAGE:
//!   - Streaming success with reasoning, text and usage
//!   - Outbound body shape (token-limit field, history conversion, stream options)
//!   - Single-shot completion
//!   - 401, 429 with and without retry-after, and 500 responses
//!   - Malformed JSON inside the SSE stream

mod common;

use common::{create_test_handler, create_test_history, sse_response};
use futures_util::StreamExt;
use multi_llm_stream::{
    ApiHandler, ChatTransport, HttpTransport, LlmError, LlmResult, StreamEvent, UsageEvent,
};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helper Functions
// ============================================================================

async fn collect_events(handler: &impl ApiHandler) -> Vec<LlmResult<StreamEvent>> {
    handler
        .create_message("You are a coding agent.", &create_test_history())
        .await
        .expect("stream should start")
        .collect()
        .await
}

// ============================================================================
// Streaming Tests
// ============================================================================

#[tokio::test]
async fn test_streaming_request_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(header("accept", "text/event-stream"))
        .and(body_partial_json(json!({
            "model": "gpt-5-mini",
            "stream": true,
            "stream_options": {"include_usage": true},
            "max_completion_tokens": 16384
        })))
        .respond_with(sse_response(&[
            json!({"choices": [{"delta": {"role": "assistant"}}]}),
            json!({"choices": [{"delta": {"reasoning": "Checking files"}}]}),
            json!({"choices": [{"delta": {"content": "Two entries."}}]}),
            json!({"choices": [], "usage": {
                "prompt_tokens": 42,
                "completion_tokens": 7,
                "prompt_tokens_details": {"cached_tokens": 32}
            }}),
        ]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let handler = create_test_handler(&mock_server.uri(), "gpt-5-mini");
    let events: Vec<StreamEvent> = collect_events(&handler)
        .await
        .into_iter()
        .map(|e| e.expect("no stream errors"))
        .collect();

    assert_eq!(
        events,
        vec![
            StreamEvent::reasoning("Checking files"),
            StreamEvent::text("Two entries."),
            StreamEvent::Usage(UsageEvent {
                input_tokens: 42,
                output_tokens: 7,
                cache_write_tokens: None,
                cache_read_tokens: Some(32),
            }),
        ]
    );
}

#[tokio::test]
async fn test_outbound_body_carries_converted_history() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(sse_response(&[json!({"choices": [{"delta": {"content": "ok"}}]})]))
        .mount(&mock_server)
        .await;

    let handler = create_test_handler(&mock_server.uri(), "gpt-5-mini");
    let _ = collect_events(&handler).await;

    let requests = mock_server
        .received_requests()
        .await
        .expect("request recording enabled");
    let body: Value = serde_json::from_slice(&requests[0].body).expect("JSON body");

    assert!(body.get("max_tokens").is_none());
    assert!(body.get("temperature").is_none());
    let messages = body["messages"].as_array().expect("messages array");
    let roles: Vec<&str> = messages
        .iter()
        .filter_map(|m| m["role"].as_str())
        .collect();
    assert_eq!(roles, vec!["system", "user", "assistant", "tool"]);
    assert_eq!(messages[2]["tool_calls"][0]["id"], json!("call_1"));
    assert_eq!(messages[3]["tool_call_id"], json!("call_1"));
}

#[tokio::test]
async fn test_malformed_json_in_stream_surfaces_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(
                    "data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n\ndata: {oops\n\n",
                ),
        )
        .mount(&mock_server)
        .await;

    let handler = create_test_handler(&mock_server.uri(), "gpt-4o");
    let results = collect_events(&handler).await;

    assert_eq!(results.len(), 2);
    assert!(matches!(results[0], Ok(StreamEvent::Text { .. })));
    assert!(matches!(
        results[1],
        Err(LlmError::ResponseParsingError { .. })
    ));
}

// ============================================================================
// Single-Shot Completion Tests
// ============================================================================

#[tokio::test]
async fn test_complete_prompt_over_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({"stream": false, "max_tokens": 8192})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hello!"}}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let handler = create_test_handler(&mock_server.uri(), "claude-sonnet-4");

    let text = handler.complete_prompt("Say hello").await.expect("completes");

    assert_eq!(text, "Hello!");
}

// ============================================================================
// Error Response Tests
// ============================================================================

#[tokio::test]
async fn test_unauthorized_maps_to_authentication_failed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&mock_server)
        .await;

    let handler = create_test_handler(&mock_server.uri(), "gpt-4o");
    let result = handler.create_message("sys", &create_test_history()).await;

    assert!(matches!(result, Err(LlmError::AuthenticationFailed { .. })));
}

#[tokio::test]
async fn test_rate_limit_uses_retry_after_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "17"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let handler = create_test_handler(&mock_server.uri(), "gpt-4o");
    let result = handler.complete_prompt("x").await;

    match result {
        Err(LlmError::RateLimitExceeded {
            retry_after_seconds,
        }) => assert_eq!(retry_after_seconds, 17),
        other => panic!("expected rate limit error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limit_without_header_defaults_to_sixty_seconds() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let handler = create_test_handler(&mock_server.uri(), "gpt-4o");
    let result = handler.complete_prompt("x").await;

    assert!(matches!(
        result,
        Err(LlmError::RateLimitExceeded {
            retry_after_seconds: 60
        })
    ));
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let handler = create_test_handler(&mock_server.uri(), "gpt-4o");
    let result = handler.create_message("sys", &[]).await;

    match result {
        Err(error @ LlmError::RequestFailed { .. }) => {
            assert!(error.to_string().contains("upstream exploded"));
            assert!(error.is_retryable(), "caller may retry, transport must not");
        }
        Err(other) => panic!("expected request failure, got {other:?}"),
        Ok(_) => panic!("expected request failure, got a stream"),
    }
}

// ============================================================================
// Transport Construction Tests
// ============================================================================

#[test]
fn test_endpoint_trims_trailing_slash() {
    let mut config = common::create_test_config("http://localhost:1234", "local-model");
    config.base_url = "http://localhost:1234/v1/".to_string();

    let transport = HttpTransport::new(&config).expect("transport builds");

    assert_eq!(transport.endpoint(), "http://localhost:1234/v1/chat/completions");
}

#[test]
fn test_auth_header_only_when_key_present() {
    let with_key = HttpTransport::build_auth_headers(Some("sk-1")).expect("headers");
    let without_key = HttpTransport::build_auth_headers(None).expect("headers");

    assert_eq!(
        with_key
            .get("authorization")
            .and_then(|v| v.to_str().ok()),
        Some("Bearer sk-1")
    );
    assert!(without_key.get("authorization").is_none());
    assert!(without_key.get("content-type").is_some());
}

#[tokio::test]
async fn test_transport_is_usable_directly() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&mock_server)
        .await;

    let handler = create_test_handler(&mock_server.uri(), "gpt-4o");
    let request = handler
        .build_request("sys", &[])
        .await
        .expect("request builds");
    let transport = HttpTransport::new(handler.config()).expect("transport builds");

    let mut completion = request;
    completion.stream = false;
    completion.stream_options = None;
    let body = transport.complete_chat(&completion).await.expect("completes");

    assert_eq!(body, json!({"choices": []}));
}
