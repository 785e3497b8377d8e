//! OpenAI-compatible stream normalizer
//!
//! Builds chat-completions requests (with model-family and prompt-cache quirks)
//! and normalizes their streamed responses into canonical events.
//!
//! ## Module Organization
//!
//! - `model_family`: model-id classification shared by every request builder
//! - `types`: outbound request and inbound chunk structures
//! - `request`: history conversion, cache breakpoints, token-limit field
//! - `stream`: delta classification and usage mapping state machine
//! - `sse`: `data:` line extraction from a response body
//! - `transport`: the transport trait and its reqwest implementation
//! - `handler`: the per-call handler tying it all together

pub mod handler;
pub mod model_family;
pub mod request;
pub mod sse;
pub mod stream;
pub mod transport;
pub mod types;

#[cfg(test)]
mod tests;

pub use handler::{ApiHandler, OpenAICompatibleHandler};
pub use model_family::{is_gpt5_family, model_family, ModelFamily, TokenLimitField};
pub use stream::{normalize_stream, EventStream, StreamNormalizer, StreamPhase, StreamStats};
pub use transport::{ChatTransport, ChunkStream, HttpTransport};
pub use types::{CacheControl, ChatContent, ChatMessage, ContentPart, OutboundRequest};
