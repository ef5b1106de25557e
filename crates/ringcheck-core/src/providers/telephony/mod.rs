pub mod vapi;

use async_trait::async_trait;

use crate::errors::ProviderResult;
use crate::locale::Locale;
use crate::model::{CallSession, TestRecord};
use crate::prompt;

/// Seconds the tester waits before speaking once the call connects.
pub const START_SPEAKING_WAIT_SECS: f64 = 2.0;

/// Tester persona configuration sent with every outbound call.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantConfig {
    pub system_prompt: String,
    /// LLM driving the tester persona.
    pub model: String,
    pub voice_id: String,
    pub transcriber_language: String,
    pub end_call_phrases: Vec<String>,
    pub wait_seconds: f64,
}

impl AssistantConfig {
    pub fn for_record(record: &TestRecord, locale: Locale, model: &str) -> Self {
        Self {
            system_prompt: prompt::tester_prompt(&record.instruction, locale.end_call_phrases()),
            model: model.to_string(),
            voice_id: locale.voice_id().to_string(),
            transcriber_language: locale.transcriber_language().to_string(),
            end_call_phrases: locale
                .end_call_phrases()
                .iter()
                .map(|p| (*p).to_string())
                .collect(),
            wait_seconds: START_SPEAKING_WAIT_SECS,
        }
    }
}

/// Places outbound calls and reports their status.
#[async_trait]
pub trait CallProvider: Send + Sync {
    async fn create_call(
        &self,
        phone_number_id: &str,
        destination: &str,
        assistant: &AssistantConfig,
    ) -> ProviderResult<CallSession>;

    async fn get_call(&self, call_id: &str) -> ProviderResult<CallSession>;

    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assistant_config_follows_locale() {
        let record = TestRecord {
            id: "1".into(),
            instruction: "Pergunte o horário de funcionamento".into(),
            ..Default::default()
        };
        let cfg = AssistantConfig::for_record(&record, Locale::Pt, "gpt-4o-2024-11-20");
        assert_eq!(cfg.voice_id, Locale::Pt.voice_id());
        assert_eq!(cfg.transcriber_language, "pt");
        assert!(cfg.end_call_phrases.contains(&"tchau".to_string()));
        assert!(cfg.system_prompt.contains("Pergunte o horário de funcionamento"));
        assert_eq!(cfg.wait_seconds, 2.0);
    }
}
