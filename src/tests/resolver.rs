// Unit Tests for Tool Protocol Resolution
//
// UNIT UNDER TEST: resolve_tool_protocol
//
// BUSINESS RESPONSIBILITY:
//   - A task that already committed to a protocol keeps it, whatever the settings say
//   - OpenAI-compatible gateways honour the user's stored protocol preference
//   - Every other provider always uses native tool calling
//   - Missing or meaningless inputs fall back to native, never to an error
//
// TEST COVERAGE:
//   - Lock precedence over provider and preference
//   - Allow-listed providers with and without a preference
//   - Non allow-listed and missing providers
//   - Empty, whitespace and unrecognized lock strings

use crate::config::ProviderSettings;
use crate::core_types::model::ModelInfo;
use crate::core_types::protocol::ToolProtocol;
use crate::protocol::{resolve_tool_protocol, USER_SELECTABLE_PROTOCOL_PROVIDERS};

// ============================================================================
// Lock Precedence Tests
// ============================================================================

#[test]
fn test_xml_lock_wins_over_native_only_provider() {
    // A resumed XML task stays XML even on a provider that is native-only today

    let settings = ProviderSettings::new("anthropic");

    let protocol = resolve_tool_protocol(&settings, None, Some("xml"));

    assert_eq!(protocol, ToolProtocol::Xml);
}

#[test]
fn test_native_lock_wins_over_xml_preference() {
    let settings = ProviderSettings::new("openai").with_tool_protocol(ToolProtocol::Xml);

    let protocol = resolve_tool_protocol(&settings, None, Some("native"));

    assert_eq!(protocol, ToolProtocol::Native);
}

#[test]
fn test_lock_wins_for_every_provider_and_preference() {
    let providers = ["openai", "lmstudio", "anthropic", "bedrock", "gemini"];
    let preferences = [None, Some(ToolProtocol::Native), Some(ToolProtocol::Xml)];

    for provider in providers {
        for preference in preferences {
            let settings = ProviderSettings {
                api_provider: Some(provider.to_string()),
                tool_protocol: preference,
            };
            for lock in [ToolProtocol::Native, ToolProtocol::Xml] {
                assert_eq!(
                    resolve_tool_protocol(&settings, None, Some(lock.as_str())),
                    lock,
                    "lock {lock} must win for provider {provider} with preference {preference:?}"
                );
            }
        }
    }
}

#[test]
fn test_empty_lock_is_treated_as_no_lock() {
    let settings = ProviderSettings::new("openai").with_tool_protocol(ToolProtocol::Xml);

    assert_eq!(
        resolve_tool_protocol(&settings, None, Some("")),
        ToolProtocol::Xml
    );
    assert_eq!(
        resolve_tool_protocol(&settings, None, Some("   ")),
        ToolProtocol::Xml
    );
}

#[test]
fn test_unrecognized_lock_is_treated_as_no_lock() {
    let settings = ProviderSettings::new("anthropic");

    let protocol = resolve_tool_protocol(&settings, None, Some("json"));

    assert_eq!(protocol, ToolProtocol::Native);
}

#[test]
fn test_lock_string_is_case_insensitive() {
    let settings = ProviderSettings::default();

    assert_eq!(
        resolve_tool_protocol(&settings, None, Some("XML")),
        ToolProtocol::Xml
    );
}

// ============================================================================
// Provider Preference Tests
// ============================================================================

#[test]
fn test_allow_listed_provider_with_preference_uses_preference() {
    for provider in USER_SELECTABLE_PROTOCOL_PROVIDERS {
        let settings = ProviderSettings::new(*provider).with_tool_protocol(ToolProtocol::Xml);

        assert_eq!(
            resolve_tool_protocol(&settings, None, None),
            ToolProtocol::Xml,
            "{provider} should honour the XML preference"
        );
    }
}

#[test]
fn test_allow_listed_provider_without_preference_is_native() {
    let settings = ProviderSettings::new("lmstudio");

    assert_eq!(
        resolve_tool_protocol(&settings, None, None),
        ToolProtocol::Native
    );
}

#[test]
fn test_non_allow_listed_provider_ignores_preference() {
    for provider in ["anthropic", "bedrock", "vertex", "gemini", "claude-code"] {
        let settings = ProviderSettings::new(provider).with_tool_protocol(ToolProtocol::Xml);

        assert_eq!(
            resolve_tool_protocol(&settings, None, None),
            ToolProtocol::Native,
            "{provider} is native-only"
        );
    }
}

#[test]
fn test_missing_provider_is_not_allow_listed() {
    let settings = ProviderSettings {
        api_provider: None,
        tool_protocol: Some(ToolProtocol::Xml),
    };

    assert_eq!(
        resolve_tool_protocol(&settings, None, None),
        ToolProtocol::Native
    );
}

#[test]
fn test_model_info_does_not_change_the_result() {
    let settings = ProviderSettings::new("openai").with_tool_protocol(ToolProtocol::Xml);
    let model_info = ModelInfo {
        max_tokens: Some(8192),
        supports_prompt_cache: true,
        ..ModelInfo::default()
    };

    assert_eq!(
        resolve_tool_protocol(&settings, Some(&model_info), None),
        resolve_tool_protocol(&settings, None, None)
    );
}
