//! Remote collaborators: telephony, speech-to-text and the judge LLM.
//!
//! The engine only sees the traits; the HTTP clients are thin adapters.

pub mod http;
pub mod llm;
pub mod stt;
pub mod telephony;

pub use llm::{openai::OpenAIClient, JsonSchemaFormat, LlmClient, LlmResponse};
pub use stt::{deepgram::DeepgramClient, Transcriber};
pub use telephony::{vapi::VapiClient, AssistantConfig, CallProvider};
