//! OpenAI-compatible API handler
//!
//! Glues the pieces together per call: model lookup, request building,
//! transport, and stream normalization. Every call builds a fresh request and
//! a fresh event stream; nothing is shared between calls.

use super::request::{build_completion_request, build_stream_request};
use super::stream::{normalize_stream, EventStream};
use super::transport::{ChatTransport, HttpTransport};
use super::types::{CompletionResponse, OutboundRequest};
use crate::config::HandlerConfig;
use crate::core_types::messages::ConversationMessage;
use crate::core_types::model::ModelCatalog;
use crate::error::{LlmError, LlmResult};
use crate::logging::log_debug;
use std::sync::Arc;
use uuid::Uuid;

/// Provider-agnostic handler interface used by the agent loop
#[async_trait::async_trait]
pub trait ApiHandler: Send + Sync {
    /// Stream a response to `messages` under `system_prompt`.
    ///
    /// Fails only if the request cannot be built or sent; later transport
    /// problems arrive as `Err` items on the stream.
    async fn create_message(
        &self,
        system_prompt: &str,
        messages: &[ConversationMessage],
    ) -> LlmResult<EventStream>;

    /// Single-shot completion returning only the finished text.
    async fn complete_prompt(&self, prompt: &str) -> LlmResult<String>;

    fn model_id(&self) -> &str;

    fn provider_name(&self) -> &'static str;
}

/// Handler for any backend speaking the OpenAI chat-completions dialect
pub struct OpenAICompatibleHandler {
    config: HandlerConfig,
    catalog: Arc<dyn ModelCatalog>,
    transport: Arc<dyn ChatTransport>,
}

impl std::fmt::Debug for OpenAICompatibleHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAICompatibleHandler")
            .field("model_id", &self.config.model_id)
            .field("base_url", &self.config.base_url)
            .field("enable_prompt_caching", &self.config.enable_prompt_caching)
            .finish_non_exhaustive()
    }
}

impl OpenAICompatibleHandler {
    /// Create a handler backed by the HTTP transport
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ConfigurationError`] if the configuration is invalid
    /// or the HTTP client cannot be built.
    pub fn new(config: HandlerConfig, catalog: Arc<dyn ModelCatalog>) -> LlmResult<Self> {
        config.validate()?;
        let transport = Arc::new(HttpTransport::new(&config)?);
        Ok(Self::with_transport(config, catalog, transport))
    }

    /// Create a handler over any transport
    pub fn with_transport(
        config: HandlerConfig,
        catalog: Arc<dyn ModelCatalog>,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        log_debug!(
            provider = "openai-compatible",
            model = %config.model_id,
            base_url = %config.base_url,
            prompt_caching = config.enable_prompt_caching,
            "Creating OpenAI-compatible handler"
        );
        Self {
            config,
            catalog,
            transport,
        }
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// Build the streaming request without sending it.
    pub async fn build_request(
        &self,
        system_prompt: &str,
        messages: &[ConversationMessage],
    ) -> LlmResult<OutboundRequest> {
        let model_info = self.catalog.model_info(&self.config.model_id).await?;
        Ok(build_stream_request(
            &self.config,
            &model_info,
            system_prompt,
            messages,
        ))
    }
}

#[async_trait::async_trait]
impl ApiHandler for OpenAICompatibleHandler {
    async fn create_message(
        &self,
        system_prompt: &str,
        messages: &[ConversationMessage],
    ) -> LlmResult<EventStream> {
        let request_id = Uuid::new_v4();
        let request = self.build_request(system_prompt, messages).await?;

        log_debug!(
            provider = self.provider_name(),
            request_id = %request_id,
            model = %request.model,
            message_count = request.messages.len(),
            max_tokens = ?request.max_tokens,
            max_completion_tokens = ?request.max_completion_tokens,
            "Starting streaming request"
        );

        let chunks = self.transport.stream_chat(&request).await?;
        Ok(normalize_stream(chunks))
    }

    async fn complete_prompt(&self, prompt: &str) -> LlmResult<String> {
        let request_id = Uuid::new_v4();
        let model_info = self.catalog.model_info(&self.config.model_id).await?;
        let request = build_completion_request(&self.config, &model_info, prompt);

        log_debug!(
            provider = self.provider_name(),
            request_id = %request_id,
            model = %request.model,
            "Starting completion request"
        );

        let body = self.transport.complete_chat(&request).await?;
        let response: CompletionResponse = serde_json::from_value(body).map_err(|e| {
            LlmError::response_parsing_error(format!("Invalid completion response: {e}"))
        })?;

        let choice = response.choices.into_iter().next().ok_or_else(|| {
            LlmError::response_parsing_error("No choices in completion response")
        })?;

        Ok(choice.message.content.unwrap_or_default())
    }

    fn model_id(&self) -> &str {
        &self.config.model_id
    }

    fn provider_name(&self) -> &'static str {
        "openai-compatible"
    }
}
