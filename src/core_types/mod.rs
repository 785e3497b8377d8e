//! Core types shared by the protocol and streaming halves of the crate
//!
//! ## Organization
//! - `protocol` - Tool protocol enum and the per-task lock
//! - `messages` - Stored conversation history
//! - `events` - Canonical stream events
//! - `model` - Model metadata and the catalog trait

pub mod events;
pub mod messages;
pub mod model;
pub mod protocol;

pub use events::{StreamEvent, UsageEvent};
pub use messages::{
    ContentBlock, ConversationMessage, MessageContent, MessageRole, ToolResultContent,
};
pub use model::{ModelCatalog, ModelInfo, StaticModelCatalog};
pub use protocol::{ProtocolLock, ToolProtocol, UnknownToolProtocol};
