//! Canonical stream events
//!
//! Every provider dialect is normalized into this sequence. Events are produced
//! incrementally and consumed in emission order.

use serde::{Deserialize, Serialize};

/// Token accounting reported by the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageEvent {
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// Tokens written to the prompt cache, when the provider reports them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_write_tokens: Option<u64>,
    /// Tokens served from the prompt cache, when the provider reports them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_read_tokens: Option<u64>,
}

/// One normalized event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Visible answer text
    Text { text: String },
    /// Reasoning / thinking text, whatever the provider called it
    Reasoning { text: String },
    /// Usage figures
    Usage(UsageEvent),
}

impl StreamEvent {
    pub fn text(text: impl Into<String>) -> Self {
        StreamEvent::Text { text: text.into() }
    }

    pub fn reasoning(text: impl Into<String>) -> Self {
        StreamEvent::Reasoning { text: text.into() }
    }

    /// Short label used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            StreamEvent::Text { .. } => "text",
            StreamEvent::Reasoning { .. } => "reasoning",
            StreamEvent::Usage(_) => "usage",
        }
    }
}
