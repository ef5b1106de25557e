//! Vapi outbound-call client.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::{AssistantConfig, CallProvider};
use crate::config::ProviderConfig;
use crate::errors::ProviderResult;
use crate::model::{CallSession, CallStatus};
use crate::providers::http::{build_client, normalize_base_url, read_json};

pub const DEFAULT_VAPI_URL: &str = "https://api.vapi.ai";

#[derive(Debug, Clone)]
pub struct VapiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl VapiClient {
    pub fn new(api_key: impl Into<String>, base_url: &str, timeout_secs: u64) -> ProviderResult<Self> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            base_url: normalize_base_url(base_url),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &ProviderConfig) -> ProviderResult<Self> {
        Self::new(&config.vapi_api_key, &config.vapi_url, config.timeout_secs)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Request body for `POST /call`.
pub(crate) fn create_call_body(
    phone_number_id: &str,
    destination: &str,
    assistant: &AssistantConfig,
) -> Value {
    json!({
        "phoneNumberId": phone_number_id,
        "customer": { "number": destination },
        "assistant": {
            "model": {
                "provider": "openai",
                "model": assistant.model,
                "messages": [
                    { "role": "system", "content": assistant.system_prompt }
                ],
                "tools": [
                    { "type": "function", "function": { "name": "endCall" } }
                ]
            },
            "startSpeakingPlan": { "waitSeconds": assistant.wait_seconds },
            "voice": {
                "provider": "11labs",
                "model": "eleven_multilingual_v2",
                "voiceId": assistant.voice_id
            },
            "transcriber": {
                "provider": "deepgram",
                "model": "nova-2",
                "language": assistant.transcriber_language
            },
            "endCallPhrases": assistant.end_call_phrases,
            "backgroundSound": "off"
        }
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VapiCall {
    id: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    artifact: Option<VapiArtifact>,
    #[serde(default)]
    recording_url: Option<String>,
    #[serde(default)]
    stereo_recording_url: Option<String>,
    #[serde(default)]
    phone_call_provider_id: Option<String>,
    #[serde(default)]
    ended_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VapiArtifact {
    #[serde(default)]
    recording_url: Option<String>,
    #[serde(default)]
    stereo_recording_url: Option<String>,
}

impl From<VapiCall> for CallSession {
    fn from(call: VapiCall) -> Self {
        let artifact = call.artifact.unwrap_or_default();
        CallSession {
            id: call.id,
            status: CallStatus::parse(&call.status),
            recording_url: artifact.recording_url.or(call.recording_url),
            stereo_recording_url: artifact.stereo_recording_url.or(call.stereo_recording_url),
            provider_call_id: call.phone_call_provider_id,
            ended_reason: call.ended_reason,
        }
    }
}

#[async_trait]
impl CallProvider for VapiClient {
    async fn create_call(
        &self,
        phone_number_id: &str,
        destination: &str,
        assistant: &AssistantConfig,
    ) -> ProviderResult<CallSession> {
        let url = format!("{}/call", self.base_url);
        debug!(url = %url, destination = %destination, "creating outbound call");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&create_call_body(phone_number_id, destination, assistant))
            .send()
            .await?;

        let call: VapiCall = read_json("call", response).await?;
        Ok(call.into())
    }

    async fn get_call(&self, call_id: &str) -> ProviderResult<CallSession> {
        let url = format!("{}/call/{}", self.base_url, call_id);
        debug!(url = %url, "fetching call status");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let call: VapiCall = read_json(&format!("call {}", call_id), response).await?;
        Ok(call.into())
    }

    fn provider_name(&self) -> &'static str {
        "vapi"
    }
}
