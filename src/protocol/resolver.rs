use crate::config::ProviderSettings;
use crate::core_types::model::ModelInfo;
use crate::core_types::protocol::{ProtocolLock, ToolProtocol};
use crate::logging::log_debug;

/// Providers that still let the user choose the tool protocol.
///
/// These are the OpenAI-compatible gateways, where some served models only
/// follow XML-style tool instructions. Everything else is native-only.
pub const USER_SELECTABLE_PROTOCOL_PROVIDERS: &[&str] =
    &["openai", "openai-compatible", "lmstudio", "ollama", "litellm"];

/// Resolve the tool protocol for the next turn.
///
/// Precedence:
/// 1. a truthy `locked_protocol` is returned as-is, so a resumed task never
///    switches protocol mid-conversation;
/// 2. an allow-listed provider with an explicit preference gets that preference;
/// 3. everything else is [`ToolProtocol::Native`].
///
/// `model_info` is accepted for forward compatibility and not consulted.
/// Empty or unrecognized lock strings count as "no lock".
pub fn resolve_tool_protocol(
    settings: &ProviderSettings,
    _model_info: Option<&ModelInfo>,
    locked_protocol: Option<&str>,
) -> ToolProtocol {
    if let Some(locked) = ProtocolLock::from_persisted(locked_protocol).protocol() {
        return locked;
    }

    if let Some(preference) = settings.tool_protocol {
        if is_user_selectable(settings.api_provider.as_deref()) {
            return preference;
        }
        log_debug!(
            api_provider = ?settings.api_provider,
            preference = %preference,
            "Ignoring tool protocol preference for native-only provider"
        );
    }

    ToolProtocol::Native
}

fn is_user_selectable(api_provider: Option<&str>) -> bool {
    api_provider.is_some_and(|provider| USER_SELECTABLE_PROTOCOL_PROVIDERS.contains(&provider))
}
