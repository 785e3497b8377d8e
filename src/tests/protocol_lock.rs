// Unit Tests for the Task Protocol Lock
//
// UNIT UNDER TEST: ToolProtocol and ProtocolLock
//
// BUSINESS RESPONSIBILITY:
//   - Parse and print protocol names the way they are persisted
//   - Lock a task to one protocol exactly once
//   - Seed the lock from stored history on resume
//   - Feed the lock into resolution so it always takes precedence
//
// TEST COVERAGE:
//   - FromStr / Display / serde round trip of ToolProtocol
//   - lock() set-once semantics
//   - from_history and from_persisted seeding
//   - resolve() delegating with the lock applied

use crate::config::ProviderSettings;
use crate::core_types::messages::{ContentBlock, ConversationMessage};
use crate::core_types::protocol::{ProtocolLock, ToolProtocol, UnknownToolProtocol};
use serde_json::json;

// ============================================================================
// ToolProtocol Tests
// ============================================================================

#[test]
fn test_tool_protocol_parses_persisted_names() {
    assert_eq!("native".parse::<ToolProtocol>(), Ok(ToolProtocol::Native));
    assert_eq!(" Xml ".parse::<ToolProtocol>(), Ok(ToolProtocol::Xml));
    assert_eq!(
        "json".parse::<ToolProtocol>(),
        Err(UnknownToolProtocol("json".to_string()))
    );
}

#[test]
fn test_tool_protocol_serializes_lowercase() {
    assert_eq!(
        serde_json::to_value(ToolProtocol::Xml).expect("serialize"),
        json!("xml")
    );
    assert_eq!(ToolProtocol::Native.to_string(), "native");
}

// ============================================================================
// Lock Lifecycle Tests
// ============================================================================

#[test]
fn test_new_lock_is_unlocked() {
    let lock = ProtocolLock::unlocked();

    assert!(!lock.is_locked());
    assert_eq!(lock.protocol(), None);
    assert_eq!(lock.as_persisted(), None);
}

#[test]
fn test_lock_is_set_once() {
    let mut lock = ProtocolLock::unlocked();

    assert!(lock.lock(ToolProtocol::Xml));
    assert!(lock.lock(ToolProtocol::Xml), "re-locking to the same value is fine");
    assert!(!lock.lock(ToolProtocol::Native), "changing protocol is refused");
    assert_eq!(lock.protocol(), Some(ToolProtocol::Xml));
    assert_eq!(lock.as_persisted(), Some("xml"));
}

#[test]
fn test_lock_from_history_uses_detector() {
    let history = vec![
        ConversationMessage::user("Go"),
        ConversationMessage::assistant(vec![ContentBlock::native_tool_use(
            "call_1",
            "execute_command",
            json!({"command": "ls"}),
        )]),
    ];

    let lock = ProtocolLock::from_history(&history);

    assert_eq!(lock.protocol(), Some(ToolProtocol::Native));
}

#[test]
fn test_lock_from_history_without_tool_calls_stays_unlocked() {
    let history = vec![ConversationMessage::user("Go")];

    assert!(!ProtocolLock::from_history(&history).is_locked());
}

#[test]
fn test_lock_from_persisted_values() {
    assert_eq!(
        ProtocolLock::from_persisted(Some("xml")).protocol(),
        Some(ToolProtocol::Xml)
    );
    assert!(!ProtocolLock::from_persisted(Some("")).is_locked());
    assert!(!ProtocolLock::from_persisted(Some("bogus")).is_locked());
    assert!(!ProtocolLock::from_persisted(None).is_locked());
}

#[test]
fn test_lock_serde_is_transparent() {
    let lock = ProtocolLock::from(Some(ToolProtocol::Native));

    assert_eq!(serde_json::to_value(lock).expect("serialize"), json!("native"));
    assert_eq!(
        serde_json::from_value::<ProtocolLock>(json!(null)).expect("deserialize"),
        ProtocolLock::unlocked()
    );
}

// ============================================================================
// Resolution Tests
// ============================================================================

#[test]
fn test_locked_resolve_ignores_settings() {
    let mut lock = ProtocolLock::unlocked();
    lock.lock(ToolProtocol::Xml);
    let settings = ProviderSettings::new("anthropic");

    assert_eq!(lock.resolve(&settings, None), ToolProtocol::Xml);
}

#[test]
fn test_unlocked_resolve_follows_settings() {
    let lock = ProtocolLock::unlocked();
    let settings = ProviderSettings::new("ollama").with_tool_protocol(ToolProtocol::Xml);

    assert_eq!(lock.resolve(&settings, None), ToolProtocol::Xml);
}
