use crate::core_types::protocol::ToolProtocol;
use crate::error::{LlmError, LlmResult};
use crate::logging::{log_debug, log_warn};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Provider settings owned by the settings subsystem
///
/// Read-only here. Only the two fields the protocol resolver looks at are modelled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSettings {
    /// Which backend family is configured (e.g. "openai", "anthropic")
    #[serde(default)]
    pub api_provider: Option<String>,
    /// The user's stored protocol preference
    #[serde(default)]
    pub tool_protocol: Option<ToolProtocol>,
}

impl ProviderSettings {
    pub fn new(api_provider: impl Into<String>) -> Self {
        Self {
            api_provider: Some(api_provider.into()),
            tool_protocol: None,
        }
    }

    pub fn with_tool_protocol(mut self, protocol: ToolProtocol) -> Self {
        self.tool_protocol = Some(protocol);
        self
    }

    /// Load settings from `AI_PROVIDER` and `AI_TOOL_PROTOCOL`
    ///
    /// Both are optional. An unparseable protocol preference is ignored with a
    /// warning rather than failing, since resolution falls back to a default anyway.
    pub fn from_env() -> Self {
        let api_provider = std::env::var("AI_PROVIDER")
            .ok()
            .filter(|p| !p.trim().is_empty());

        let tool_protocol = std::env::var("AI_TOOL_PROTOCOL")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .and_then(|raw| match raw.parse::<ToolProtocol>() {
                Ok(protocol) => Some(protocol),
                Err(e) => {
                    log_warn!(value = %raw, error = %e, "Ignoring invalid AI_TOOL_PROTOCOL");
                    None
                }
            });

        log_debug!(
            api_provider = ?api_provider,
            tool_protocol = ?tool_protocol,
            "Loaded provider settings from environment"
        );

        Self {
            api_provider,
            tool_protocol,
        }
    }
}

/// Configuration for an OpenAI-compatible streaming handler
///
/// `Debug` output never includes the API key.
#[derive(Clone, Serialize, Deserialize)]
pub struct HandlerConfig {
    pub api_key: Option<String>,
    /// Base URL including the API version segment, e.g. `https://api.openai.com/v1`
    pub base_url: String,
    /// Model id sent upstream and looked up in the model catalog
    pub model_id: String,
    /// Attach cache-control breakpoints when the model supports prompt caching
    pub enable_prompt_caching: bool,
    /// Sampling temperature; never sent to models that reject it
    pub temperature: Option<f32>,
    /// Whole-request timeout for the HTTP transport
    pub request_timeout_secs: u64,
    /// Ask the provider to append a usage chunk to the stream
    pub include_usage: bool,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model_id: "gpt-4o".to_string(),
            enable_prompt_caching: false,
            temperature: Some(0.0),
            request_timeout_secs: 600,
            include_usage: true,
        }
    }
}

impl std::fmt::Debug for HandlerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model_id", &self.model_id)
            .field("enable_prompt_caching", &self.enable_prompt_caching)
            .field("temperature", &self.temperature)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("include_usage", &self.include_usage)
            .finish()
    }
}

impl HandlerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate handler configuration
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ConfigurationError`] if the base URL or model id is
    /// empty, or the API key is present but blank.
    pub fn validate(&self) -> LlmResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(LlmError::configuration_error("Base URL is required"));
        }
        if self.model_id.trim().is_empty() {
            return Err(LlmError::configuration_error("Model id is required"));
        }
        if self.api_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
            return Err(LlmError::configuration_error("API key must not be blank"));
        }
        if self.request_timeout_secs == 0 {
            return Err(LlmError::configuration_error(
                "Request timeout must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Load configuration from environment variables
    ///
    /// Reads `OPENAI_API_KEY`, `OPENAI_BASE_URL`, `LLM_MODEL_ID` and
    /// `LLM_PROMPT_CACHING` (`true`/`1` to enable). Unset variables keep defaults.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ConfigurationError`] if the resulting configuration
    /// fails [`validate`](Self::validate).
    pub fn from_env() -> LlmResult<Self> {
        let mut config = Self::default();

        if let Ok(api_key) = std::env::var("OPENAI_API_KEY") {
            config.api_key = Some(api_key);
        }
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(model_id) = std::env::var("LLM_MODEL_ID") {
            config.model_id = model_id;
        }
        if let Ok(flag) = std::env::var("LLM_PROMPT_CACHING") {
            config.enable_prompt_caching = matches!(flag.trim(), "1" | "true" | "TRUE" | "yes");
        }

        config.validate()?;

        log_debug!(
            base_url = %config.base_url,
            model = %config.model_id,
            has_api_key = config.api_key.is_some(),
            prompt_caching = config.enable_prompt_caching,
            "Handler configuration loaded and validated"
        );

        Ok(config)
    }
}
