//! Transport seam and the reqwest-backed HTTP implementation
//!
//! The normalizer only ever sees a [`ChunkStream`] of raw JSON chunks, so any
//! transport (HTTP, recorded fixtures, an SDK) can sit behind [`ChatTransport`].
//! No retries happen here; failures go straight back to the caller.

use super::sse::sse_data_stream;
use super::types::OutboundRequest;
use crate::config::HandlerConfig;
use crate::error::{LlmError, LlmResult};
use crate::logging::{log_debug, log_error};
use futures_util::stream::{Stream, StreamExt};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use std::pin::Pin;

/// Raw provider chunks, one JSON value per SSE `data:` payload
pub type ChunkStream = Pin<Box<dyn Stream<Item = LlmResult<Value>> + Send>>;

/// Sends outbound requests to a provider
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send a streaming request and return its chunk stream.
    async fn stream_chat(&self, request: &OutboundRequest) -> LlmResult<ChunkStream>;

    /// Send a non-streaming request and return the parsed response body.
    async fn complete_chat(&self, request: &OutboundRequest) -> LlmResult<Value>;
}

/// HTTP transport for OpenAI-compatible `/chat/completions` endpoints
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    headers: HeaderMap,
    timeout_seconds: u64,
}

impl HttpTransport {
    /// Build a transport from handler configuration
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ConfigurationError`] if the API key cannot be used
    /// as a header value or the HTTP client cannot be built.
    pub fn new(config: &HandlerConfig) -> LlmResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| LlmError::configuration_error(format!("Invalid HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            headers: Self::build_auth_headers(config.api_key.as_deref())?,
            timeout_seconds: config.request_timeout_secs,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// JSON content type plus bearer auth when a key is configured
    pub fn build_auth_headers(api_key: Option<&str>) -> LlmResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(api_key) = api_key {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
                    LlmError::configuration_error(format!("Invalid API key format: {e}"))
                })?,
            );
        }

        Ok(headers)
    }

    async fn send(&self, request: &OutboundRequest) -> LlmResult<reqwest::Response> {
        let mut headers = self.headers.clone();
        if request.stream {
            headers.insert(ACCEPT, HeaderValue::from_static("text/event-stream"));
        }

        log_debug!(
            endpoint = %self.endpoint,
            model = %request.model,
            stream = request.stream,
            message_count = request.messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .headers(headers)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    return LlmError::timeout(self.timeout_seconds);
                }
                log_error!(endpoint = %self.endpoint, error = %e, "HTTP request failed");
                LlmError::request_failed(format!("Request failed: {e}"), Some(Box::new(e)))
            })?;

        if !response.status().is_success() {
            return Err(handle_error_response(response).await);
        }

        Ok(response)
    }
}

#[async_trait::async_trait]
impl ChatTransport for HttpTransport {
    async fn stream_chat(&self, request: &OutboundRequest) -> LlmResult<ChunkStream> {
        let response = self.send(request).await?;

        let chunks = sse_data_stream(response.bytes_stream()).map(|data| {
            let data = data?;
            serde_json::from_str::<Value>(&data).map_err(|e| {
                LlmError::response_parsing_error(format!("Invalid JSON in stream chunk: {e}"))
            })
        });

        Ok(Box::pin(chunks))
    }

    async fn complete_chat(&self, request: &OutboundRequest) -> LlmResult<Value> {
        let response = self.send(request).await?;

        let raw_body = response.text().await.map_err(|e| {
            LlmError::response_parsing_error(format!("Failed to read response: {e}"))
        })?;

        serde_json::from_str(&raw_body).map_err(|e| {
            log_error!(error = %e, raw_body = %raw_body, "Failed to parse response");
            LlmError::response_parsing_error(format!("Invalid response: {e}"))
        })
    }
}

/// Map a non-success HTTP response onto an error
async fn handle_error_response(response: reqwest::Response) -> LlmError {
    let status = response.status();
    let retry_after = response
        .headers()
        .get("retry-after")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok());
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    log_error!(
        status = %status,
        error_text = %error_text,
        "API error response"
    );

    match status.as_u16() {
        401 | 403 => LlmError::authentication_failed(format!("Authentication failed ({status})")),
        429 => LlmError::rate_limit_exceeded(retry_after.unwrap_or(60)),
        _ => LlmError::request_failed(format!("API error {status}: {error_text}"), None),
    }
}
