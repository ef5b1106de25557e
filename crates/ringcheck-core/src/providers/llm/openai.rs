use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use super::{JsonSchemaFormat, LlmClient, LlmResponse};
use crate::config::ProviderConfig;
use crate::errors::{ProviderError, ProviderResult};
use crate::providers::http::{build_client, normalize_base_url, read_json};

pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";

pub struct OpenAIClient {
    pub model: String,
    pub temperature: f32,
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAIClient {
    pub fn new(
        model: String,
        api_key: String,
        temperature: f32,
        base_url: &str,
        timeout_secs: u64,
    ) -> ProviderResult<Self> {
        Ok(Self {
            model,
            temperature,
            api_key,
            base_url: normalize_base_url(base_url),
            client: build_client(timeout_secs)?,
        })
    }

    pub fn from_config(config: &ProviderConfig, model: String) -> ProviderResult<Self> {
        Self::new(
            model,
            config.openai_api_key.clone(),
            0.0,
            &config.openai_url,
            config.timeout_secs,
        )
    }

    pub(crate) fn request_body(&self, prompt: &str, format: Option<&JsonSchemaFormat>) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": prompt }
            ],
            "temperature": self.temperature,
        });

        if let Some(format) = format {
            body["response_format"] = json!({
                "type": "json_schema",
                "json_schema": {
                    "name": format.name,
                    "schema": format.schema,
                    "strict": format.strict,
                }
            });
        }
        body
    }
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(
        &self,
        prompt: &str,
        response_format: Option<&JsonSchemaFormat>,
    ) -> ProviderResult<LlmResponse> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        debug!(url = %url, model = %self.model, "chat completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt, response_format))
            .send()
            .await?;

        let json: Value = read_json("chat completion", response).await?;

        if let Some(refusal) = json
            .pointer("/choices/0/message/refusal")
            .and_then(|v| v.as_str())
        {
            return Err(ProviderError::invalid_response(format!(
                "model refused: {}",
                refusal
            )));
        }

        // Parse choices[0].message.content
        let text = json
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ProviderError::invalid_response("OpenAI API response missing content"))?
            .to_string();

        Ok(LlmResponse {
            text,
            provider: "openai".to_string(),
            model: self.model.clone(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
