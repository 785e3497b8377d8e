//! Conversation history as the agent loop stores it
//!
//! Messages carry either a plain string or an ordered list of content blocks.
//! A `tool_use` block with a non-empty `id` was produced by a native tool call;
//! one without an `id` came from XML-style markup. Code that writes history must
//! keep that invariant, because protocol detection relies on it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message roles in stored history
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
    /// Any role this crate does not interpret
    #[serde(other)]
    Other,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
            MessageRole::Tool => write!(f, "tool"),
            MessageRole::Other => write!(f, "other"),
        }
    }
}

/// One block of structured message content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text
    Text { text: String },
    /// Tool invocation; `id` is present only for native tool calls
    ToolUse {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        name: String,
        #[serde(default)]
        input: serde_json::Value,
    },
    /// Tool execution result
    ToolResult {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tool_use_id: Option<String>,
        #[serde(default)]
        content: ToolResultContent,
        #[serde(default)]
        is_error: bool,
    },
    /// Block kinds owned by other parts of the system (images, documents, ...)
    #[serde(other)]
    Unsupported,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    /// Native tool call block (carries an id)
    pub fn native_tool_use(
        id: impl Into<String>,
        name: impl Into<String>,
        input: serde_json::Value,
    ) -> Self {
        ContentBlock::ToolUse {
            id: Some(id.into()),
            name: name.into(),
            input,
        }
    }

    /// XML-protocol tool call block (no id)
    pub fn xml_tool_use(name: impl Into<String>, input: serde_json::Value) -> Self {
        ContentBlock::ToolUse {
            id: None,
            name: name.into(),
            input,
        }
    }

    pub fn tool_result(tool_use_id: Option<String>, content: impl Into<ToolResultContent>) -> Self {
        ContentBlock::ToolResult {
            tool_use_id,
            content: content.into(),
            is_error: false,
        }
    }

    pub fn is_tool_use(&self) -> bool {
        matches!(self, ContentBlock::ToolUse { .. })
    }

    /// The block's id when it is a tool call with a non-empty id.
    pub fn tool_use_id(&self) -> Option<&str> {
        match self {
            ContentBlock::ToolUse { id: Some(id), .. } if !id.is_empty() => Some(id),
            _ => None,
        }
    }
}

/// Message content: a bare string or an ordered list of blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl MessageContent {
    /// Blocks when the content is a block list, `None` for bare strings.
    pub fn blocks(&self) -> Option<&[ContentBlock]> {
        match self {
            MessageContent::Blocks(blocks) => Some(blocks),
            MessageContent::Text(_) => None,
        }
    }

    /// Concatenated text of all text blocks (or the bare string).
    pub fn joined_text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Blocks(blocks) => join_text_blocks(blocks),
        }
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        MessageContent::Text(text)
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        MessageContent::Text(text.to_string())
    }
}

impl From<Vec<ContentBlock>> for MessageContent {
    fn from(blocks: Vec<ContentBlock>) -> Self {
        MessageContent::Blocks(blocks)
    }
}

/// Tool result payload: a bare string or nested blocks (text, images, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolResultContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl Default for ToolResultContent {
    fn default() -> Self {
        ToolResultContent::Text(String::new())
    }
}

impl ToolResultContent {
    /// Text of the result; nested non-text blocks are skipped.
    pub fn joined_text(&self) -> String {
        match self {
            ToolResultContent::Text(text) => text.clone(),
            ToolResultContent::Blocks(blocks) => join_text_blocks(blocks),
        }
    }
}

impl From<String> for ToolResultContent {
    fn from(text: String) -> Self {
        ToolResultContent::Text(text)
    }
}

impl From<&str> for ToolResultContent {
    fn from(text: &str) -> Self {
        ToolResultContent::Text(text.to_string())
    }
}

impl From<Vec<ContentBlock>> for ToolResultContent {
    fn from(blocks: Vec<ContentBlock>) -> Self {
        ToolResultContent::Blocks(blocks)
    }
}

fn join_text_blocks(blocks: &[ContentBlock]) -> String {
    blocks
        .iter()
        .filter_map(|block| match block {
            ContentBlock::Text { text } => Some(text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A stored conversation message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: MessageRole,
    pub content: MessageContent,
    /// Creation time, persisted as epoch milliseconds
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub ts: Option<DateTime<Utc>>,
}

impl ConversationMessage {
    pub fn new(role: MessageRole, content: impl Into<MessageContent>) -> Self {
        Self {
            role,
            content: content.into(),
            ts: None,
        }
    }

    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<MessageContent>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    /// Stamp the message with the current time
    pub fn stamped(mut self) -> Self {
        self.ts = Some(Utc::now());
        self
    }

    /// Whether this is an assistant message whose block content holds a tool call.
    pub fn has_tool_use(&self) -> bool {
        self.role == MessageRole::Assistant
            && self
                .content
                .blocks()
                .is_some_and(|blocks| blocks.iter().any(ContentBlock::is_tool_use))
    }
}
