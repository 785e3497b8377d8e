//! Logging utilities for multi-llm-stream
//!
//! Re-exports the tracing macros under `log_*` names so every module logs the same way.

pub use tracing::{debug as log_debug, error as log_error, info as log_info, warn as log_warn};
