//! Error types shared across the engine.

use std::time::Duration;

/// Errors returned by the remote provider clients (telephony, speech-to-text, LLM).
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Credentials rejected by the provider.
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// Resource (call, recording) does not exist.
    #[error("not found: {resource}")]
    NotFound { resource: String },

    /// Rate limit exceeded.
    #[error("rate limited: retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    /// Transport failure (connect, timeout, body read).
    #[error("network error: {message}")]
    Network { message: String },

    /// Any other non-success status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Response arrived but did not have the expected shape.
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },
}

impl ProviderError {
    /// Whether a later attempt may succeed.
    ///
    /// Diagnostic only: logged with each failed status query. The poll loop counts
    /// every failure against the same budget and waits the fixed interval,
    /// ignoring `retry_after`.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Network { .. } => true,
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub(crate) fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Failures that end a single trial before any verdict exists.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The telephony provider refused to create the call. Never retried.
    #[error("call creation failed: {0}")]
    CallCreation(#[source] ProviderError),
}

/// Operator-facing configuration problems. Always fatal before any call is placed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable: {name}")]
    MissingEnv { name: &'static str },

    #[error("unsupported locale: {value} (supported: en, es, pt)")]
    UnsupportedLocale { value: String },

    #[error("invalid value for {name}: {message}")]
    Invalid { name: &'static str, message: String },
}
