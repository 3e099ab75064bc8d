pub mod context;
pub mod fallback;
pub mod prompt;
pub mod reference;

use std::sync::Arc;

use opentelemetry::KeyValue;

use crate::error::{AppError, AppResult};
use crate::llm::{FailureKind, GenerateRequest, LlmClient};
use crate::snapshot::HealthSnapshot;
use crate::telemetry::metrics::ASSISTANT_FALLBACK_RESPONSES;

use context::TargetRange;

#[derive(Debug, Clone, PartialEq)]
pub struct AssistantReply {
    pub text: String,
    /// Provider that produced `text`, `None` when a fallback string was used.
    pub provider: Option<String>,
    pub failure: Option<FailureKind>,
}

pub struct Assistant {
    pub llm: Arc<LlmClient>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub max_query_chars: usize,
    pub target: TargetRange,
}

impl Assistant {
    pub fn validate_query<'a>(&self, query: Option<&'a str>) -> AppResult<&'a str> {
        let query = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| AppError::Validation("query must be a non-empty string".into()))?;

        if query.chars().count() > self.max_query_chars {
            return Err(AppError::Validation(format!(
                "query must be at most {} characters",
                self.max_query_chars
            )));
        }

        Ok(query)
    }

    pub fn build_request(&self, question: &str, snapshot: &HealthSnapshot) -> GenerateRequest {
        let context = context::build_context(snapshot, self.target);

        GenerateRequest {
            model: self.model.clone(),
            system: prompt::SYSTEM_INSTRUCTION.to_string(),
            prompt: prompt::build_prompt(&context, question),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    /// Never fails: provider errors are logged and replaced by the fallback
    /// message for their failure kind.
    #[tracing::instrument(
        name = "assistant ask",
        skip(self, question, snapshot),
        fields(
            assistant.query_chars = question.chars().count(),
            assistant.provider,
            assistant.failure_kind,
        )
    )]
    pub async fn ask(&self, question: &str, snapshot: &HealthSnapshot) -> AssistantReply {
        let req = self.build_request(question, snapshot);
        let span = tracing::Span::current();

        match self.llm.generate(&req).await {
            Ok(resp) => {
                span.record("assistant.provider", resp.provider.as_str());
                AssistantReply {
                    text: resp.content.trim().to_string(),
                    provider: Some(resp.provider),
                    failure: None,
                }
            }
            Err(err) => {
                let kind = FailureKind::classify(&err);
                span.record("assistant.failure_kind", kind.as_str());

                tracing::warn!(
                    error = %err,
                    failure_kind = kind.as_str(),
                    "Assistant request failed, answering with fallback message"
                );

                ASSISTANT_FALLBACK_RESPONSES
                    .add(1, &[KeyValue::new("failure.kind", kind.as_str())]);

                AssistantReply {
                    text: fallback::fallback_message(kind).to_string(),
                    provider: None,
                    failure: Some(kind),
                }
            }
        }
    }
}
