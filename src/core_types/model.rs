//! Model metadata and the catalog seam
//!
//! The model registry lives outside this crate. Handlers receive it as a
//! [`ModelCatalog`] and only read the few capabilities they need.

use crate::error::LlmResult;
use crate::logging::log_debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Capabilities and pricing of one model
///
/// Missing values stay `None`: a missing output limit means no limit is sent,
/// never a guessed one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Maximum output tokens
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Context window size in tokens
    #[serde(default)]
    pub context_window: Option<u32>,
    /// Whether the model accepts cache-control breakpoints
    #[serde(default)]
    pub supports_prompt_cache: bool,
    #[serde(default)]
    pub supports_images: bool,
    /// USD per million input tokens
    #[serde(default)]
    pub input_price: Option<f64>,
    /// USD per million output tokens
    #[serde(default)]
    pub output_price: Option<f64>,
    #[serde(default)]
    pub cache_writes_price: Option<f64>,
    #[serde(default)]
    pub cache_reads_price: Option<f64>,
}

/// Source of model metadata
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ModelCatalog: Send + Sync {
    /// Look up a model by id.
    ///
    /// Unknown ids are not an error; implementations return default
    /// (capability-less) info instead.
    async fn model_info(&self, model_id: &str) -> LlmResult<ModelInfo>;
}

/// In-memory catalog, handy for configuration files and tests
#[derive(Debug, Clone, Default)]
pub struct StaticModelCatalog {
    models: HashMap<String, ModelInfo>,
}

impl StaticModelCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a model entry
    pub fn with_model(mut self, model_id: impl Into<String>, info: ModelInfo) -> Self {
        self.models.insert(model_id.into(), info);
        self
    }

    pub fn get(&self, model_id: &str) -> Option<&ModelInfo> {
        self.models.get(model_id)
    }
}

#[async_trait::async_trait]
impl ModelCatalog for StaticModelCatalog {
    async fn model_info(&self, model_id: &str) -> LlmResult<ModelInfo> {
        match self.models.get(model_id) {
            Some(info) => Ok(info.clone()),
            None => {
                log_debug!(model = %model_id, "Model not in catalog, using capability-less defaults");
                Ok(ModelInfo::default())
            }
        }
    }
}
