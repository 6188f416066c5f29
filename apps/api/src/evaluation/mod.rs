//! Evaluation providers — anything that turns submission text into raw category scores.
//!
//! `AppState` holds an `Arc<dyn EvaluationProvider>`, picked at startup from config:
//! `HeuristicProvider` (deterministic, no network) or `LlmProvider`.
//! The formatter never assumes which one produced the scores.

pub mod handlers;
pub mod heuristic;
pub mod llm;
pub mod pipeline;
pub mod prompts;
pub mod questions;
mod text;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::rubric::models::RawEvaluation;
use crate::rubric::registry::ModeConfig;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("LLM provider error: {0}")]
    Llm(#[from] LlmError),

    #[error("Provider returned malformed output: {0}")]
    Malformed(String),

    #[error("Provider reported an error: {0}")]
    Reported(String),

    #[error("Provider does not support mode '{0}'")]
    UnsupportedMode(String),
}

/// Mode-specific free-text fields of a submission. Persisted verbatim in history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EvaluationInputs {
    Resume {
        job_description: String,
        resume_text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filename: Option<String>,
    },
    Interview {
        question: String,
        answer: String,
        #[serde(default)]
        job_role: String,
        #[serde(default)]
        job_description: String,
    },
}

impl EvaluationInputs {
    pub fn mode_key(&self) -> &'static str {
        match self {
            EvaluationInputs::Resume { .. } => "resume",
            EvaluationInputs::Interview { .. } => "interview",
        }
    }

    /// Total UTF-8 bytes across all fields.
    pub fn input_length(&self) -> usize {
        match self {
            EvaluationInputs::Resume {
                job_description,
                resume_text,
                ..
            } => job_description.len() + resume_text.len(),
            EvaluationInputs::Interview {
                question,
                answer,
                job_role,
                job_description,
            } => question.len() + answer.len() + job_role.len() + job_description.len(),
        }
    }
}

#[async_trait]
pub trait EvaluationProvider: Send + Sync {
    /// Short label for logs ("heuristic" | "llm").
    fn name(&self) -> &'static str;

    async fn evaluate(
        &self,
        mode: &ModeConfig,
        inputs: &EvaluationInputs,
    ) -> Result<RawEvaluation, ProviderError>;
}

/// Runs a provider call with a bounded wait so a hung provider can't stall the request forever.
pub async fn evaluate_with_timeout(
    provider: &dyn EvaluationProvider,
    mode: &ModeConfig,
    inputs: &EvaluationInputs,
    limit: Duration,
) -> Result<RawEvaluation, ProviderError> {
    tokio::time::timeout(limit, provider.evaluate(mode, inputs))
        .await
        .map_err(|_| ProviderError::Timeout(limit))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rubric::registry::ModeRegistry;
    use serde_json::json;

    struct HangingProvider;

    #[async_trait]
    impl EvaluationProvider for HangingProvider {
        fn name(&self) -> &'static str {
            "hanging"
        }

        async fn evaluate(
            &self,
            _mode: &ModeConfig,
            _inputs: &EvaluationInputs,
        ) -> Result<RawEvaluation, ProviderError> {
            std::future::pending().await
        }
    }

    fn interview_inputs() -> EvaluationInputs {
        EvaluationInputs::Interview {
            question: "Why Rust?".to_string(),
            answer: "Because of ownership.".to_string(),
            job_role: "Engineer".to_string(),
            job_description: String::new(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_provider_times_out() {
        let registry = ModeRegistry::builtin().unwrap();
        let mode = registry.get("interview").unwrap();
        let err = evaluate_with_timeout(
            &HangingProvider,
            mode,
            &interview_inputs(),
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ProviderError::Timeout(d) if d == Duration::from_secs(5)));
        assert_eq!(err.to_string(), "Provider timed out after 5s");
    }

    #[test]
    fn test_inputs_tagged_by_mode() {
        let value = serde_json::to_value(interview_inputs()).unwrap();
        assert_eq!(value["mode"], "interview");

        let resume: EvaluationInputs = serde_json::from_value(json!({
            "mode": "resume",
            "job_description": "Rust engineer",
            "resume_text": "Built things"
        }))
        .unwrap();
        assert_eq!(resume.mode_key(), "resume");
        assert_eq!(resume.input_length(), "Rust engineer".len() + "Built things".len());
    }
}
