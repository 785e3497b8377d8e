//! Error types for streaming and request-building operations.
//!
//! Protocol resolution and detection never fail, so everything in this module
//! concerns the outbound side: building a request, talking to the transport,
//! and reading the provider's response.
//!
//! # Error Types
//!
//! The main error type is [`LlmError`], which covers:
//! - Configuration errors (missing API key, empty model id)
//! - Transport failures (network issues, provider HTTP errors)
//! - Rate limiting and timeouts
//! - Authentication failures
//! - Malformed top-level responses and interrupted streams
//!
//! Malformed *fields* inside an otherwise valid chunk are not errors; the
//! stream normalizer drops them and keeps going.
//!
//! # Error Handling Example
//!
//! ```rust,no_run
//! use multi_llm_stream::{LlmError, error::ErrorCategory};
//!
//! fn handle_error(err: LlmError) {
//!     // This crate never retries; the caller owns that policy
//!     if err.is_retryable() {
//!         println!("Retryable error: {}", err);
//!     }
//!
//!     match err.category() {
//!         ErrorCategory::Transient => println!("Temporary issue, try again later"),
//!         ErrorCategory::Client => println!("Fix the request and try again"),
//!         _ => println!("Tell user: {}", err.user_message()),
//!     }
//! }
//! ```

use crate::logging::{log_error, log_warn};
use thiserror::Error;

// ============================================================================
// Error categorization types
// ============================================================================

/// High-level categorization of errors for routing and handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// External service failures (LLM providers, network issues).
    External,

    /// Client errors (invalid input, authentication, configuration).
    ///
    /// The caller made a mistake that they can fix.
    Client,

    /// Temporary failures that the caller may retry.
    ///
    /// Rate limits and timeouts. Backoff is the caller's responsibility.
    Transient,
}

/// Severity level for logging and alerting decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Action failed but system is stable.
    Error,

    /// Unexpected but recoverable situation.
    Warning,
}

// ============================================================================
// LLM Error types
// ============================================================================

/// Convenient result type for request and stream operations.
pub type LlmResult<T> = std::result::Result<T, LlmError>;

/// Errors that can occur while building, sending, or reading a provider request.
///
/// Use the constructor methods, which log automatically:
///
/// ```rust
/// use multi_llm_stream::LlmError;
///
/// let err = LlmError::configuration_error("Missing API key");
/// let err = LlmError::rate_limit_exceeded(60);
/// let err = LlmError::timeout(30);
/// ```
///
/// | Variant | Category | Retryable |
/// |---------|----------|-----------|
/// | `ConfigurationError` | Client | No |
/// | `RequestFailed` | External | Yes |
/// | `ResponseParsingError` | External | No |
/// | `RateLimitExceeded` | Transient | Yes |
/// | `Timeout` | Transient | Yes |
/// | `AuthenticationFailed` | Client | No |
/// | `StreamInterrupted` | External | Yes |
#[derive(Error, Debug)]
pub enum LlmError {
    /// Handler configuration is invalid or incomplete.
    #[error("Provider configuration error: {message}")]
    ConfigurationError {
        /// Description of the configuration problem.
        message: String,
    },

    /// The HTTP request to the provider failed.
    #[error("Request failed: {message}")]
    RequestFailed {
        /// Description of the failure.
        message: String,
        /// The underlying error, if available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The provider's response (or a streamed chunk) could not be parsed at the top level.
    #[error("Response parsing failed: {message}")]
    ResponseParsingError {
        /// Details about the parsing failure.
        message: String,
    },

    /// Provider rate limit exceeded.
    #[error("Rate limit exceeded, retry after {retry_after_seconds}s")]
    RateLimitExceeded {
        /// Recommended wait time before retrying.
        retry_after_seconds: u64,
    },

    /// Request timed out.
    #[error("Request timed out after {timeout_seconds}s")]
    Timeout {
        /// The timeout duration that was exceeded.
        timeout_seconds: u64,
    },

    /// Authentication with the provider failed.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed {
        /// Details about the authentication failure.
        message: String,
    },

    /// The response body stream broke after streaming had started.
    #[error("Stream interrupted: {message}")]
    StreamInterrupted {
        /// Details reported by the transport.
        message: String,
    },
}

impl LlmError {
    /// Get the error category for routing and handling decisions.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigurationError { .. } => ErrorCategory::Client,
            Self::RequestFailed { .. } => ErrorCategory::External,
            Self::ResponseParsingError { .. } => ErrorCategory::External,
            Self::RateLimitExceeded { .. } => ErrorCategory::Transient,
            Self::Timeout { .. } => ErrorCategory::Transient,
            Self::AuthenticationFailed { .. } => ErrorCategory::Client,
            Self::StreamInterrupted { .. } => ErrorCategory::External,
        }
    }

    /// Get the error severity for logging and alerting.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ConfigurationError { .. } => ErrorSeverity::Error,
            Self::RequestFailed { .. } => ErrorSeverity::Error,
            Self::ResponseParsingError { .. } => ErrorSeverity::Warning,
            Self::RateLimitExceeded { .. } => ErrorSeverity::Warning,
            Self::Timeout { .. } => ErrorSeverity::Warning,
            Self::AuthenticationFailed { .. } => ErrorSeverity::Error,
            Self::StreamInterrupted { .. } => ErrorSeverity::Warning,
        }
    }

    /// Whether the caller may reasonably retry the whole request.
    ///
    /// This is advice only; nothing in this crate acts on it.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimitExceeded { .. }
                | Self::Timeout { .. }
                | Self::RequestFailed { .. }
                | Self::StreamInterrupted { .. }
        )
    }

    /// Convert to a user-friendly message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            Self::ConfigurationError { .. } => {
                "AI service configuration issue. Please check your settings".to_string()
            }
            Self::RequestFailed { .. } => {
                "Unable to communicate with AI service. Please try again".to_string()
            }
            Self::ResponseParsingError { .. } => {
                "Received an invalid response from AI service".to_string()
            }
            Self::RateLimitExceeded {
                retry_after_seconds,
            } => {
                format!("Service is busy. Please wait {retry_after_seconds} seconds and try again")
            }
            Self::Timeout { .. } => "Request timed out. Please try again".to_string(),
            Self::AuthenticationFailed { .. } => {
                "Authentication failed. Please check your credentials".to_string()
            }
            Self::StreamInterrupted { .. } => {
                "The response was cut off. Please try again".to_string()
            }
        }
    }

    // =========================================================================
    // Constructor methods with automatic logging
    // =========================================================================

    pub fn configuration_error(message: impl Into<String>) -> Self {
        let message = message.into();
        log_error!(
            error_type = "configuration_error",
            message = %message,
            "Handler configuration validation failed"
        );
        Self::ConfigurationError { message }
    }

    pub fn request_failed(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        let message = message.into();
        log_error!(
            error_type = "request_failed",
            message = %message,
            has_source = source.is_some(),
            "Provider request failed"
        );
        Self::RequestFailed { message, source }
    }

    pub fn response_parsing_error(message: impl Into<String>) -> Self {
        let message = message.into();
        log_warn!(
            error_type = "response_parsing_error",
            message = %message,
            "Provider response format invalid"
        );
        Self::ResponseParsingError { message }
    }

    pub fn rate_limit_exceeded(retry_after_seconds: u64) -> Self {
        log_warn!(
            error_type = "rate_limit_exceeded",
            retry_after_seconds = retry_after_seconds,
            "Provider rate limit exceeded"
        );
        Self::RateLimitExceeded {
            retry_after_seconds,
        }
    }

    pub fn timeout(timeout_seconds: u64) -> Self {
        log_warn!(
            error_type = "timeout",
            timeout_seconds = timeout_seconds,
            "Provider request timed out"
        );
        Self::Timeout { timeout_seconds }
    }

    pub fn authentication_failed(message: impl Into<String>) -> Self {
        let message = message.into();
        log_error!(
            error_type = "authentication_failed",
            message = %message,
            "Provider authentication failed"
        );
        Self::AuthenticationFailed { message }
    }

    pub fn stream_interrupted(message: impl Into<String>) -> Self {
        let message = message.into();
        log_warn!(
            error_type = "stream_interrupted",
            message = %message,
            "Provider stream ended with a transport error"
        );
        Self::StreamInterrupted { message }
    }
}
