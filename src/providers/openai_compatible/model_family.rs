//! Model-family detection by model id
//!
//! Every family-dependent request quirk goes through [`model_family`], so the
//! streaming and single-shot builders can never disagree about a model.

use once_cell::sync::Lazy;
use regex::Regex;

/// Family patterns, matched against the normalized final path segment of a model id.
static FAMILY_PATTERNS: Lazy<Vec<(ModelFamily, Regex)>> = Lazy::new(|| {
    let mut patterns = Vec::new();

    // gpt-5, gpt5, gpt-5.1, gpt-5-mini, gpt-5o, gpt-5-chat-latest
    if let Ok(regex) = Regex::new(r"^gpt5") {
        patterns.push((ModelFamily::Gpt5, regex));
    }

    patterns
});

/// Model families with distinct request rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    /// GPT-5 and its variants (`gpt-5`, `gpt5`, `gpt-5.1`, `gpt-5-mini`, `gpt-5o`, ...)
    Gpt5,
    /// Everything else
    Default,
}

/// Name of the output-token limit field a family expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenLimitField {
    MaxTokens,
    MaxCompletionTokens,
}

impl TokenLimitField {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenLimitField::MaxTokens => "max_tokens",
            TokenLimitField::MaxCompletionTokens => "max_completion_tokens",
        }
    }
}

impl ModelFamily {
    pub fn token_limit_field(&self) -> TokenLimitField {
        match self {
            ModelFamily::Gpt5 => TokenLimitField::MaxCompletionTokens,
            ModelFamily::Default => TokenLimitField::MaxTokens,
        }
    }

    /// GPT-5 models reject any non-default temperature.
    pub fn supports_temperature(&self) -> bool {
        matches!(self, ModelFamily::Default)
    }
}

/// Lowercase the last `/`-separated segment of a model id and strip separators.
///
/// `"openai/GPT-5.1-mini"` becomes `"gpt51mini"`.
pub fn normalize_model_id(model_id: &str) -> String {
    let last_segment = model_id.rsplit('/').next().unwrap_or(model_id);
    last_segment
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Classify a model id.
pub fn model_family(model_id: &str) -> ModelFamily {
    let normalized = normalize_model_id(model_id);
    FAMILY_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(&normalized))
        .map_or(ModelFamily::Default, |(family, _)| *family)
}

pub fn is_gpt5_family(model_id: &str) -> bool {
    model_family(model_id) == ModelFamily::Gpt5
}
