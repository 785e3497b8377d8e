//! # multi-llm-stream
//!
//! Tool-protocol resolution and provider stream normalization for an LLM agent loop.
//!
//! ## Key Features
//!
//! - **Protocol Resolution**: Decide per turn whether tools are called natively or via XML markup
//! - **Protocol Detection**: Infer the protocol a resumed conversation was already using
//! - **Stream Normalization**: Map OpenAI-compatible chunks onto text, reasoning and usage events
//! - **Model Quirks**: GPT-5 token-limit field and prompt-cache breakpoints handled centrally
//!
//! ## Example
//!
//! ```rust,no_run
//! use multi_llm_stream::{
//!     ApiHandler, ConversationMessage, HandlerConfig, OpenAICompatibleHandler,
//!     StaticModelCatalog, StreamEvent,
//! };
//! use futures_util::StreamExt;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = HandlerConfig {
//!     api_key: Some("your-api-key".to_string()),
//!     model_id: "gpt-4o".to_string(),
//!     ..HandlerConfig::default()
//! };
//!
//! let handler = OpenAICompatibleHandler::new(config, Arc::new(StaticModelCatalog::new()))?;
//! let history = vec![ConversationMessage::user("Hello, how are you?")];
//!
//! let mut events = handler.create_message("You are helpful.", &history).await?;
//! while let Some(event) = events.next().await {
//!     if let StreamEvent::Text { text } = event? {
//!         print!("{text}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

// Allow missing errors documentation - errors are self-documenting via type signatures
#![allow(clippy::missing_errors_doc)]

pub mod core_types;

// Logging utilities (re-exports tracing with log_* naming) - internal only
pub(crate) mod logging;

pub mod config;
pub mod error;
pub mod protocol;
pub mod providers;

#[cfg(test)]
mod tests;

pub use config::{HandlerConfig, ProviderSettings};
pub use error::{LlmError, LlmResult};
pub use protocol::{
    detect_tool_protocol_from_history, resolve_tool_protocol, USER_SELECTABLE_PROTOCOL_PROVIDERS,
};
pub use providers::openai_compatible::{
    is_gpt5_family, normalize_stream, ApiHandler, ChatTransport, EventStream, HttpTransport,
    OpenAICompatibleHandler, OutboundRequest,
};

pub use core_types::{
    ContentBlock, ConversationMessage, MessageContent, MessageRole, ModelCatalog, ModelInfo,
    ProtocolLock, StaticModelCatalog, StreamEvent, ToolProtocol, ToolResultContent, UsageEvent,
};
