use std::time::Duration;

use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest, ChatResponseFormat, JsonSpec};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::trial::{Evaluation, FactCheck, GroundTruth, HumanFeedback, Trial};

use super::error::{OracleCall, OracleError};
use super::schema;
use super::Oracle;

const SYSTEM_PROMPT: &str = "You are a forensic LLM auditor. Respond with a single JSON \
    object matching the requested schema exactly. No prose outside the JSON.";

/// Production oracle client over the `genai` provider.
///
/// Every call sends a natural-language instruction plus a declared JSON
/// response schema and runs under a per-call deadline. No caching: `derive`
/// re-derives ground truth on every call, even for identical questions.
pub struct GenaiOracle {
    client: Client,
    model: String,
    timeout: Duration,
}

impl std::fmt::Debug for GenaiOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiOracle")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GenaiOracle {
    pub fn new(model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::default(),
            model: model.into(),
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.oracle_model.clone(), config.oracle_timeout)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn exec_json(
        &self,
        call: OracleCall,
        prompt: String,
        schema_name: &str,
        response_schema: Value,
    ) -> Result<Value, OracleError> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(prompt),
        ]);

        let options = ChatOptions::default().with_response_format(ChatResponseFormat::JsonSpec(
            JsonSpec::new(schema_name, response_schema),
        ));

        let response = with_deadline(
            call,
            self.timeout,
            self.client.exec_chat(&self.model, request, Some(&options)),
        )
        .await?
        .map_err(|e| OracleError::Transport {
            call,
            message: e.to_string(),
        })?;

        let text = response
            .first_text()
            .filter(|t| !t.trim().is_empty())
            .ok_or(OracleError::EmptyResponse { call })?;

        debug!(%call, response_len = text.len(), "oracle responded");

        serde_json::from_str(strip_code_fences(text))
            .map_err(|e| OracleError::SchemaMismatch { call, source: e })
    }

    fn parse<T: serde::de::DeserializeOwned>(
        call: OracleCall,
        value: Value,
    ) -> Result<T, OracleError> {
        serde_json::from_value(value).map_err(|e| OracleError::SchemaMismatch { call, source: e })
    }
}

/// Runs an oracle call under its per-call deadline; expiry becomes
/// [`OracleError::Timeout`] tagged with the call that blew it.
async fn with_deadline<T>(
    call: OracleCall,
    deadline: Duration,
    fut: impl std::future::Future<Output = T>,
) -> Result<T, OracleError> {
    tokio::time::timeout(deadline, fut)
        .await
        .map_err(|_| OracleError::Timeout {
            call,
            seconds: deadline.as_secs(),
        })
}

/// Removes a surrounding markdown code fence, if the provider added one
/// despite the JSON response format.
pub(crate) fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim_start_matches(['\r', '\n'])
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}

#[async_trait]
impl Oracle for GenaiOracle {
    #[instrument(skip(self, question), fields(model = %self.model))]
    async fn derive(&self, question: &str) -> Result<GroundTruth, OracleError> {
        let value = self
            .exec_json(
                OracleCall::Derive,
                schema::derive_prompt(question),
                "ground_truth",
                schema::ground_truth_schema(),
            )
            .await?;
        Self::parse(OracleCall::Derive, value)
    }

    #[instrument(skip(self, trial), fields(trial_id = %trial.id, model = %self.model))]
    async fn score(&self, trial: &Trial) -> Result<Evaluation, OracleError> {
        let value = self
            .exec_json(
                OracleCall::Score,
                schema::score_prompt(trial),
                "evaluation",
                schema::evaluation_schema(),
            )
            .await?;
        Self::parse(OracleCall::Score, value)
    }

    #[instrument(skip(self, trial), fields(trial_id = %trial.id, model = %self.model))]
    async fn check(&self, trial: &Trial) -> Result<FactCheck, OracleError> {
        let value = self
            .exec_json(
                OracleCall::Check,
                schema::check_prompt(trial),
                "fact_check",
                schema::fact_check_schema(),
            )
            .await?;
        Self::parse(OracleCall::Check, value)
    }

    #[instrument(skip(self, trial), fields(trial_id = %trial.id, model = %self.model))]
    async fn review(&self, trial: &Trial) -> Result<HumanFeedback, OracleError> {
        let value = self
            .exec_json(
                OracleCall::Review,
                schema::review_prompt(trial),
                "human_feedback",
                schema::feedback_schema(),
            )
            .await?;
        Self::parse(OracleCall::Review, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences_plain_json() {
        assert_eq!(strip_code_fences(r#"{"a": 1}"#), r#"{"a": 1}"#);
    }

    #[test]
    fn test_strip_code_fences_json_fence() {
        let fenced = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(fenced), r#"{"a": 1}"#);
    }

    #[test]
    fn test_strip_code_fences_bare_fence() {
        let fenced = "```\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(fenced), r#"{"a": 1}"#);
    }

    #[test]
    fn test_strip_code_fences_whitespace() {
        assert_eq!(strip_code_fences("  \n {\"a\": 1} \n"), r#"{"a": 1}"#);
    }

    #[tokio::test]
    async fn test_deadline_expiry_becomes_timeout_error() {
        let result: Result<(), OracleError> = with_deadline(
            OracleCall::Score,
            Duration::from_millis(20),
            std::future::pending(),
        )
        .await;

        assert!(matches!(
            result,
            Err(OracleError::Timeout {
                call: OracleCall::Score,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_deadline_lets_fast_calls_through() {
        let result = with_deadline(OracleCall::Derive, Duration::from_secs(5), async { 7 }).await;
        assert_eq!(result.unwrap(), 7);
    }
}
