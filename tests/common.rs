//! Test helper utilities for multi-llm-stream integration tests
//!
//! Reusable fixtures shared by the integration test files.
//!
//! IMPORTANT: These helpers are test-only and should NEVER be used in production code.

// Allow dead code in test utilities - functions are used across different test files
#![allow(dead_code)]

use multi_llm_stream::{
    ContentBlock, ConversationMessage, HandlerConfig, ModelInfo, OpenAICompatibleHandler,
    StaticModelCatalog,
};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::ResponseTemplate;

/// Handler configuration pointing at a mock server
///
/// `base_url` is the server root; the `/v1` segment is appended here.
pub fn create_test_config(base_url: &str, model_id: &str) -> HandlerConfig {
    HandlerConfig {
        api_key: Some("test-key".to_string()),
        base_url: format!("{base_url}/v1"),
        model_id: model_id.to_string(),
        enable_prompt_caching: false,
        temperature: Some(0.0),
        request_timeout_secs: 5,
        include_usage: true,
    }
}

/// Catalog knowing a GPT-5 family model and a caching-capable model
pub fn create_test_catalog() -> StaticModelCatalog {
    StaticModelCatalog::new()
        .with_model(
            "gpt-5-mini",
            ModelInfo {
                max_tokens: Some(16_384),
                context_window: Some(400_000),
                ..ModelInfo::default()
            },
        )
        .with_model(
            "claude-sonnet-4",
            ModelInfo {
                max_tokens: Some(8192),
                context_window: Some(200_000),
                supports_prompt_cache: true,
                ..ModelInfo::default()
            },
        )
}

/// Handler using the real HTTP transport against `base_url`
///
/// # Panics
///
/// Panics if the configuration is invalid (test failure is appropriate).
pub fn create_test_handler(base_url: &str, model_id: &str) -> OpenAICompatibleHandler {
    OpenAICompatibleHandler::new(
        create_test_config(base_url, model_id),
        Arc::new(create_test_catalog()),
    )
    .expect("Failed to create test handler")
}

/// A short native-tool conversation
pub fn create_test_history() -> Vec<ConversationMessage> {
    vec![
        ConversationMessage::user("List the files"),
        ConversationMessage::assistant(vec![ContentBlock::native_tool_use(
            "call_1",
            "list_files",
            json!({"path": "."}),
        )]),
        ConversationMessage::user(vec![ContentBlock::tool_result(
            Some("call_1".to_string()),
            "Cargo.toml\nsrc/",
        )]),
    ]
}

/// Render chunks as an SSE body terminated by `[DONE]`
pub fn sse_body(chunks: &[Value]) -> String {
    let mut body = String::new();
    for chunk in chunks {
        body.push_str("data: ");
        body.push_str(&chunk.to_string());
        body.push_str("\n\n");
    }
    body.push_str("data: [DONE]\n\n");
    body
}

/// 200 response carrying an SSE body
pub fn sse_response(chunks: &[Value]) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/event-stream")
        .set_body_string(sse_body(chunks))
}
