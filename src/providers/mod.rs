//! Provider implementations
//!
//! - **openai_compatible**: handler for any backend speaking the OpenAI
//!   chat-completions dialect (OpenAI, LM Studio, Ollama, LiteLLM, OpenRouter, ...)
//!
//! ## Architecture
//!
//! ```text
//! ConversationMessage[] ──> request.rs ──> OutboundRequest
//!                                             │
//!                                       ChatTransport (HTTP + SSE)
//!                                             │
//!                     raw JSON chunks ──> stream.rs ──> StreamEvent stream
//! ```

pub mod openai_compatible;

pub use openai_compatible::{ApiHandler, ChatTransport, HttpTransport, OpenAICompatibleHandler};
