//! Tool protocol resolution and detection
//!
//! - `resolver` - picks the protocol for the next turn from settings and an optional lock
//! - `detector` - infers the protocol a conversation has been using from its history
//!
//! Neither depends on the other. Both are pure and safe to call from any thread.

mod detector;
mod resolver;

pub use detector::detect_tool_protocol_from_history;
pub use resolver::{resolve_tool_protocol, USER_SELECTABLE_PROTOCOL_PROVIDERS};
