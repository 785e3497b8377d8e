use crate::core_types::messages::{ContentBlock, ConversationMessage};
use crate::core_types::protocol::ToolProtocol;

/// Infer the protocol of the most recent tool call in `messages`.
///
/// Looks at the last assistant message holding a tool call, then at the last
/// tool call inside it: a non-empty `id` means [`ToolProtocol::Native`], no id
/// means [`ToolProtocol::Xml`]. Returns `None` when the history holds no tool
/// call at all; callers must treat that as "no opinion".
pub fn detect_tool_protocol_from_history(
    messages: &[ConversationMessage],
) -> Option<ToolProtocol> {
    let message = last_tool_call_message(messages)?;
    let block = last_tool_call_block(message.content.blocks()?)?;

    Some(match block.tool_use_id() {
        Some(_) => ToolProtocol::Native,
        None => ToolProtocol::Xml,
    })
}

/// Most recent assistant message whose block content contains a tool call.
fn last_tool_call_message(messages: &[ConversationMessage]) -> Option<&ConversationMessage> {
    messages.iter().rev().find(|m| m.has_tool_use())
}

/// Most recent tool call block in one message's content.
fn last_tool_call_block(blocks: &[ContentBlock]) -> Option<&ContentBlock> {
    blocks.iter().rev().find(|b| b.is_tool_use())
}
