//! Deepgram pre-recorded transcription client.

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use super::Transcriber;
use crate::config::ProviderConfig;
use crate::errors::ProviderResult;
use crate::providers::http::{build_client, normalize_base_url, read_json};

pub const DEFAULT_DEEPGRAM_URL: &str = "https://api.deepgram.com";
pub const DEFAULT_DEEPGRAM_MODEL: &str = "nova-2";

#[derive(Debug, Clone)]
pub struct DeepgramClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl DeepgramClient {
    pub fn new(api_key: impl Into<String>, base_url: &str, timeout_secs: u64) -> ProviderResult<Self> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            base_url: normalize_base_url(base_url),
            api_key: api_key.into(),
            model: DEFAULT_DEEPGRAM_MODEL.to_string(),
        })
    }

    pub fn from_config(config: &ProviderConfig) -> ProviderResult<Self> {
        Self::new(&config.deepgram_api_key, &config.deepgram_url, config.timeout_secs)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl Transcriber for DeepgramClient {
    async fn transcribe_url(&self, url: &str) -> ProviderResult<serde_json::Value> {
        let endpoint = format!("{}/v1/listen", self.base_url);
        debug!(endpoint = %endpoint, recording = %url, "requesting multichannel transcription");

        let response = self
            .client
            .post(&endpoint)
            .header(reqwest::header::AUTHORIZATION, format!("Token {}", self.api_key))
            .query(&[
                ("model", self.model.as_str()),
                ("multichannel", "true"),
                ("detect_language", "true"),
            ])
            .json(&json!({ "url": url }))
            .send()
            .await?;

        read_json("transcription", response).await
    }

    fn provider_name(&self) -> &'static str {
        "deepgram"
    }
}
