//! Credentials and run settings.
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `VAPI_API_KEY` | Telephony API key (required) |
//! | `VAPI_NUMBER_ID` | Phone number id the tester calls from (required) |
//! | `OPENAI_API_KEY` | Judge LLM API key (required) |
//! | `DEEPGRAM_API_KEY` | Speech-to-text API key (required) |
//! | `RINGCHECK_VAPI_URL` | Telephony base URL override |
//! | `RINGCHECK_DEEPGRAM_URL` | Speech-to-text base URL override |
//! | `RINGCHECK_OPENAI_URL` | LLM base URL override |
//! | `RINGCHECK_TIMEOUT` | HTTP timeout in seconds (default: 30) |

use std::time::Duration;

use crate::errors::ConfigError;
use crate::locale::Locale;
use crate::providers::llm::openai::DEFAULT_OPENAI_URL;
use crate::providers::stt::deepgram::DEFAULT_DEEPGRAM_URL;
use crate::providers::telephony::vapi::DEFAULT_VAPI_URL;

pub const DEFAULT_MODEL: &str = "gpt-4o-2024-11-20";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_POLL_FAILURES: u32 = 10;
pub const DEFAULT_MAX_CONCURRENT_CALLS: usize = 10;

fn default_timeout() -> u64 {
    30
}

/// Provider credentials and endpoints.
#[derive(Clone)]
pub struct ProviderConfig {
    pub vapi_api_key: String,
    pub vapi_number_id: String,
    pub openai_api_key: String,
    pub deepgram_api_key: String,
    pub vapi_url: String,
    pub deepgram_url: String,
    pub openai_url: String,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("vapi_number_id", &self.vapi_number_id)
            .field("vapi_url", &self.vapi_url)
            .field("deepgram_url", &self.deepgram_url)
            .field("openai_url", &self.openai_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

impl ProviderConfig {
    pub fn new(
        vapi_api_key: impl Into<String>,
        vapi_number_id: impl Into<String>,
        openai_api_key: impl Into<String>,
        deepgram_api_key: impl Into<String>,
    ) -> Self {
        Self {
            vapi_api_key: vapi_api_key.into(),
            vapi_number_id: vapi_number_id.into(),
            openai_api_key: openai_api_key.into(),
            deepgram_api_key: deepgram_api_key.into(),
            vapi_url: DEFAULT_VAPI_URL.to_string(),
            deepgram_url: DEFAULT_DEEPGRAM_URL.to_string(),
            openai_url: DEFAULT_OPENAI_URL.to_string(),
            timeout_secs: default_timeout(),
        }
    }

    /// Create config from environment variables. All four credentials are required.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::new(
            required_env("VAPI_API_KEY")?,
            required_env("VAPI_NUMBER_ID")?,
            required_env("OPENAI_API_KEY")?,
            required_env("DEEPGRAM_API_KEY")?,
        );

        if let Ok(url) = std::env::var("RINGCHECK_VAPI_URL") {
            config = config.with_vapi_url(url);
        }
        if let Ok(url) = std::env::var("RINGCHECK_DEEPGRAM_URL") {
            config = config.with_deepgram_url(url);
        }
        if let Ok(url) = std::env::var("RINGCHECK_OPENAI_URL") {
            config = config.with_openai_url(url);
        }
        if let Ok(raw) = std::env::var("RINGCHECK_TIMEOUT") {
            let secs = raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                name: "RINGCHECK_TIMEOUT",
                message: e.to_string(),
            })?;
            config = config.with_timeout_secs(secs);
        }

        Ok(config)
    }

    pub fn with_vapi_url(mut self, url: impl Into<String>) -> Self {
        self.vapi_url = url.into();
        self
    }

    pub fn with_deepgram_url(mut self, url: impl Into<String>) -> Self {
        self.deepgram_url = url.into();
        self
    }

    pub fn with_openai_url(mut self, url: impl Into<String>) -> Self {
        self.openai_url = url.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

fn required_env(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingEnv { name }),
    }
}

/// Poll loop tuning for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// Status query failures tolerated per session before the trial aborts. Never reset.
    pub max_failures: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_failures: DEFAULT_MAX_POLL_FAILURES,
        }
    }
}

/// Settings for a batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub locale: Locale,
    /// Telephony number the tester calls from.
    pub phone_number_id: String,
    pub poll: PollPolicy,
    pub max_concurrent_calls: usize,
    pub judge_model: String,
    pub tester_model: String,
}

impl RunConfig {
    pub fn new(phone_number_id: impl Into<String>) -> Self {
        Self {
            locale: Locale::default(),
            phone_number_id: phone_number_id.into(),
            poll: PollPolicy::default(),
            max_concurrent_calls: DEFAULT_MAX_CONCURRENT_CALLS,
            judge_model: DEFAULT_MODEL.to_string(),
            tester_model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll.interval = interval;
        self
    }

    pub fn with_max_poll_failures(mut self, max: u32) -> Self {
        self.poll.max_failures = max.max(1);
        self
    }

    pub fn with_max_concurrent_calls(mut self, max: usize) -> Self {
        self.max_concurrent_calls = max.max(1);
        self
    }

    pub fn with_judge_model(mut self, model: impl Into<String>) -> Self {
        self.judge_model = model.into();
        self
    }

    pub fn with_tester_model(mut self, model: impl Into<String>) -> Self {
        self.tester_model = model.into();
        self
    }
}
