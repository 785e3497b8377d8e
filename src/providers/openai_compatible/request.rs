//! Outbound request construction
//!
//! Turns a system prompt plus stored history into an [`OutboundRequest`],
//! applying the model-family and prompt-cache rules. Streaming and single-shot
//! requests share [`apply_model_family_rules`].

use super::model_family::{model_family, TokenLimitField};
use super::types::{
    CacheControl, ChatContent, ChatMessage, ContentPart, FunctionCall, OutboundRequest,
    StreamOptions, ToolCallParam,
};
use crate::config::HandlerConfig;
use crate::core_types::messages::{ContentBlock, ConversationMessage, MessageContent, MessageRole};
use crate::core_types::model::ModelInfo;
use crate::logging::log_debug;

/// Placeholder text for a cache breakpoint on a message with no text part.
const EMPTY_BREAKPOINT_TEXT: &str = "...";

/// Number of trailing user messages that receive a cache breakpoint.
const USER_CACHE_BREAKPOINTS: usize = 2;

/// Build a streaming chat request.
pub fn build_stream_request(
    config: &HandlerConfig,
    model_info: &ModelInfo,
    system_prompt: &str,
    history: &[ConversationMessage],
) -> OutboundRequest {
    let mut messages = vec![ChatMessage::text("system", system_prompt)];
    messages.extend(convert_history(history));

    if prompt_caching_enabled(config, model_info) {
        apply_cache_breakpoints(&mut messages);
    }

    let mut request = OutboundRequest {
        model: config.model_id.clone(),
        messages,
        max_tokens: None,
        max_completion_tokens: None,
        temperature: None,
        stream: true,
        stream_options: config.include_usage.then_some(StreamOptions {
            include_usage: true,
        }),
    };
    apply_model_family_rules(&mut request, model_info, config.temperature);
    request
}

/// Build a single-shot (non-streaming) request for one user prompt.
pub fn build_completion_request(
    config: &HandlerConfig,
    model_info: &ModelInfo,
    prompt: &str,
) -> OutboundRequest {
    let mut request = OutboundRequest {
        model: config.model_id.clone(),
        messages: vec![ChatMessage::text("user", prompt)],
        max_tokens: None,
        max_completion_tokens: None,
        temperature: None,
        stream: false,
        stream_options: None,
    };
    apply_model_family_rules(&mut request, model_info, config.temperature);
    request
}

/// Caching needs both the session flag and a model that honours breakpoints.
pub fn prompt_caching_enabled(config: &HandlerConfig, model_info: &ModelInfo) -> bool {
    config.enable_prompt_caching && model_info.supports_prompt_cache
}

/// Set the token-limit field and temperature the request's model family expects.
///
/// Without a known `max_tokens` neither limit field is sent.
pub fn apply_model_family_rules(
    request: &mut OutboundRequest,
    model_info: &ModelInfo,
    temperature: Option<f32>,
) {
    let family = model_family(&request.model);

    request.max_tokens = None;
    request.max_completion_tokens = None;
    if let Some(limit) = model_info.max_tokens {
        match family.token_limit_field() {
            TokenLimitField::MaxTokens => request.max_tokens = Some(limit),
            TokenLimitField::MaxCompletionTokens => request.max_completion_tokens = Some(limit),
        }
    }

    request.temperature = temperature.filter(|_| family.supports_temperature());

    log_debug!(
        model = %request.model,
        family = ?family,
        token_limit_field = family.token_limit_field().as_str(),
        max_tokens = ?model_info.max_tokens,
        "Applied model family request rules"
    );
}

/// Mark the system message and the last two user messages as cache breakpoints.
pub fn apply_cache_breakpoints(messages: &mut [ChatMessage]) {
    if let Some(system) = messages.iter_mut().find(|m| m.role == "system") {
        mark_cache_breakpoint(system);
    }

    for message in messages
        .iter_mut()
        .rev()
        .filter(|m| m.role == "user")
        .take(USER_CACHE_BREAKPOINTS)
    {
        mark_cache_breakpoint(message);
    }
}

/// Attach a cache marker to a message's last text part.
///
/// Bare string content is first wrapped in a one-element part list, since the
/// marker belongs to a content part rather than to the whole message.
fn mark_cache_breakpoint(message: &mut ChatMessage) {
    let mut parts = match message.content.take() {
        Some(ChatContent::Text(text)) => vec![ContentPart::text(text)],
        Some(ChatContent::Parts(parts)) => parts,
        None => Vec::new(),
    };

    match parts.last_mut() {
        Some(ContentPart::Text { cache_control, .. }) => {
            *cache_control = Some(CacheControl::ephemeral());
        }
        None => parts.push(ContentPart::Text {
            text: EMPTY_BREAKPOINT_TEXT.to_string(),
            cache_control: Some(CacheControl::ephemeral()),
        }),
    }

    message.content = Some(ChatContent::Parts(parts));
}

// ============================================================================
// History conversion
// ============================================================================

/// Convert stored history into chat messages, preserving order.
pub fn convert_history(history: &[ConversationMessage]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len());
    for message in history {
        match message.role {
            MessageRole::User | MessageRole::Tool => {
                convert_user_message(&message.content, &mut messages)
            }
            MessageRole::Assistant => {
                if let Some(converted) = convert_assistant_message(&message.content) {
                    messages.push(converted);
                }
            }
            MessageRole::System => {
                messages.push(ChatMessage::text("system", message.content.joined_text()))
            }
            MessageRole::Other => {
                log_debug!("Skipping history message with unsupported role");
            }
        }
    }
    messages
}

/// User-side content: native tool results become `tool` messages, everything
/// textual stays on one `user` message after them.
fn convert_user_message(content: &MessageContent, out: &mut Vec<ChatMessage>) {
    let blocks = match content {
        MessageContent::Text(text) => {
            out.push(ChatMessage::text("user", text.clone()));
            return;
        }
        MessageContent::Blocks(blocks) => blocks,
    };

    let mut parts = Vec::new();
    for block in blocks {
        match block {
            ContentBlock::Text { text } => parts.push(ContentPart::text(text.clone())),
            ContentBlock::ToolResult {
                tool_use_id: Some(id),
                content,
                ..
            } if !id.is_empty() => out.push(ChatMessage {
                role: "tool".to_string(),
                content: Some(ChatContent::Text(content.joined_text())),
                tool_calls: None,
                tool_call_id: Some(id.clone()),
            }),
            ContentBlock::ToolResult { content, .. } => {
                parts.push(ContentPart::text(content.joined_text()))
            }
            ContentBlock::ToolUse { .. } | ContentBlock::Unsupported => {}
        }
    }

    if !parts.is_empty() {
        out.push(ChatMessage {
            role: "user".to_string(),
            content: Some(ChatContent::Parts(parts)),
            tool_calls: None,
            tool_call_id: None,
        });
    }
}

/// Assistant content: text joined, native tool calls moved to `tool_calls`.
///
/// Id-less (XML) tool blocks are dropped; their markup already lives in the
/// assistant text. Returns `None` when nothing is left to send.
fn convert_assistant_message(content: &MessageContent) -> Option<ChatMessage> {
    let blocks = match content {
        MessageContent::Text(text) => return Some(ChatMessage::text("assistant", text.clone())),
        MessageContent::Blocks(blocks) => blocks,
    };

    let tool_calls: Vec<ToolCallParam> = blocks
        .iter()
        .filter_map(|block| match block {
            ContentBlock::ToolUse {
                id: Some(id),
                name,
                input,
            } if !id.is_empty() => Some(ToolCallParam {
                id: id.clone(),
                call_type: "function".to_string(),
                function: FunctionCall {
                    name: name.clone(),
                    arguments: input.to_string(),
                },
            }),
            _ => None,
        })
        .collect();

    let text = content.joined_text();
    if text.is_empty() && tool_calls.is_empty() {
        return None;
    }

    Some(ChatMessage {
        role: "assistant".to_string(),
        content: (!text.is_empty()).then_some(ChatContent::Text(text)),
        tool_calls: (!tool_calls.is_empty()).then_some(tool_calls),
        tool_call_id: None,
    })
}
