//! Tool invocation protocol and the per-task protocol lock
//!
//! A conversation either calls tools through structured native fields (the
//! provider's `tool_calls`) or through inline XML-like markup in the assistant
//! text. Once a task has committed to one of the two, the lock keeps it there.

use crate::core_types::messages::ConversationMessage;
use crate::core_types::model::ModelInfo;
use crate::config::ProviderSettings;
use crate::logging::{log_info, log_warn};
use crate::protocol::{detect_tool_protocol_from_history, resolve_tool_protocol};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a model invokes tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolProtocol {
    /// Structured tool calls carried in provider-native fields, each with an id.
    Native,
    /// Tool calls written inline as XML-style markup, without ids.
    Xml,
}

impl ToolProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolProtocol::Native => "native",
            ToolProtocol::Xml => "xml",
        }
    }
}

impl std::fmt::Display for ToolProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known protocol name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tool protocol: {0:?}")]
pub struct UnknownToolProtocol(pub String);

impl FromStr for ToolProtocol {
    type Err = UnknownToolProtocol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" => Ok(ToolProtocol::Native),
            "xml" => Ok(ToolProtocol::Xml),
            _ => Err(UnknownToolProtocol(s.to_string())),
        }
    }
}

/// Per-task protocol lock.
///
/// Set once, from the first observed tool call (usually via
/// [`ProtocolLock::from_history`] on resume), and never changed afterwards.
/// Persisted with the task as a plain string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProtocolLock(Option<ToolProtocol>);

impl ProtocolLock {
    /// An empty lock; the resolver's own policy applies.
    pub fn unlocked() -> Self {
        Self(None)
    }

    /// Seed a lock from stored conversation history.
    ///
    /// Stays unlocked when the history holds no tool call.
    pub fn from_history(messages: &[ConversationMessage]) -> Self {
        Self(detect_tool_protocol_from_history(messages))
    }

    /// Restore a lock from its persisted string form.
    ///
    /// Empty or unrecognized values mean "no lock".
    pub fn from_persisted(value: Option<&str>) -> Self {
        let Some(raw) = value.filter(|v| !v.trim().is_empty()) else {
            return Self(None);
        };
        match raw.parse::<ToolProtocol>() {
            Ok(protocol) => Self(Some(protocol)),
            Err(e) => {
                log_warn!(value = %raw, error = %e, "Ignoring unrecognized persisted protocol lock");
                Self(None)
            }
        }
    }

    pub fn protocol(&self) -> Option<ToolProtocol> {
        self.0
    }

    pub fn is_locked(&self) -> bool {
        self.0.is_some()
    }

    /// String form to persist with the task (`None` while unlocked).
    pub fn as_persisted(&self) -> Option<&'static str> {
        self.0.map(|p| p.as_str())
    }

    /// Lock to `protocol` if not already locked.
    ///
    /// Returns `true` when the lock now holds `protocol`. An existing lock to a
    /// different protocol is left untouched and `false` is returned.
    pub fn lock(&mut self, protocol: ToolProtocol) -> bool {
        match self.0 {
            None => {
                log_info!(protocol = %protocol, "Locking task tool protocol");
                self.0 = Some(protocol);
                true
            }
            Some(existing) if existing == protocol => true,
            Some(existing) => {
                log_warn!(
                    locked = %existing,
                    requested = %protocol,
                    "Refusing to change an established tool protocol lock"
                );
                false
            }
        }
    }

    /// Resolve the effective protocol with this lock taking precedence.
    pub fn resolve(&self, settings: &ProviderSettings, model_info: Option<&ModelInfo>) -> ToolProtocol {
        resolve_tool_protocol(settings, model_info, self.as_persisted())
    }
}

impl From<Option<ToolProtocol>> for ProtocolLock {
    fn from(value: Option<ToolProtocol>) -> Self {
        Self(value)
    }
}
