//! LLM-as-judge gateway: one criterion + one transcript -> one [`Verdict`].
//!
//! The gateway never fails. Transport errors, refusals and unparseable output all
//! resolve to an explicit failing verdict with empty reasoning, so every criterion
//! still yields a row.

mod client;

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use crate::model::Verdict;
use crate::prompt;
use crate::providers::llm::{JsonSchemaFormat, LlmClient};

pub const VERDICT_SCHEMA_NAME: &str = "judge_response";

/// JSON schema constraining the judge to exactly `passed` and `reasoning`.
pub fn verdict_schema() -> JsonSchemaFormat {
    JsonSchemaFormat {
        name: VERDICT_SCHEMA_NAME.to_string(),
        schema: json!({
            "type": "object",
            "properties": {
                "passed": { "type": "boolean" },
                "reasoning": { "type": "string" }
            },
            "required": ["passed", "reasoning"],
            "additionalProperties": false
        }),
        strict: true,
    }
}

#[derive(Clone)]
pub struct JudgeService {
    client: Arc<dyn LlmClient>,
    schema: JsonSchemaFormat,
}

impl JudgeService {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            schema: verdict_schema(),
        }
    }

    pub async fn judge(&self, criterion: &str, transcript: &str) -> Verdict {
        let prompt = prompt::judge_prompt(criterion, transcript);

        let resp = match self.client.complete(&prompt, Some(&self.schema)).await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(
                    error = %e,
                    provider = self.client.provider_name(),
                    "judge request failed; recording failing verdict"
                );
                return Verdict::unjudged();
            }
        };

        match client::parse_verdict(&resp.text) {
            Ok(verdict) => {
                debug!(passed = verdict.passed, model = %resp.model, "judge verdict");
                verdict
            }
            Err(e) => {
                warn!(error = %e, "unparseable judge output; recording failing verdict");
                Verdict::unjudged()
            }
        }
    }
}
