pub mod openai;

use async_trait::async_trait;

use crate::errors::ProviderResult;

#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    pub text: String,
    pub provider: String,
    pub model: String,
}

/// Structured-output constraint: the model must answer with JSON matching `schema`.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonSchemaFormat {
    pub name: String,
    pub schema: serde_json::Value,
    pub strict: bool,
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send `prompt` as the system message; optionally constrain the reply to a JSON schema.
    async fn complete(
        &self,
        prompt: &str,
        response_format: Option<&JsonSchemaFormat>,
    ) -> ProviderResult<LlmResponse>;

    fn provider_name(&self) -> &'static str;
}
