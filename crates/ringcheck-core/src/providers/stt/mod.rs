pub mod deepgram;

use async_trait::async_trait;

use crate::errors::ProviderResult;

/// Transcribes a hosted recording into per-channel word timings.
///
/// Implementations request multichannel output with language auto-detection and
/// return the raw payload; [`crate::transcript::Transcript::from_stt_payload`] reads it.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe_url(&self, url: &str) -> ProviderResult<serde_json::Value>;

    fn provider_name(&self) -> &'static str;
}
