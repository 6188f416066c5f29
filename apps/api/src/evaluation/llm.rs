//! LLM-backed provider. Sends the rubric and submission to the model and expects
//! a `RawEvaluation`-shaped JSON reply.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};

use crate::evaluation::prompts::{
    EVALUATION_SYSTEM, INTERVIEW_EVALUATION_PROMPT, RESUME_EVALUATION_PROMPT,
};
use crate::evaluation::{EvaluationInputs, EvaluationProvider, ProviderError};
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, SCORE_RANGE_INSTRUCTION};
use crate::llm_client::LlmClient;
use crate::rubric::models::RawEvaluation;
use crate::rubric::registry::ModeConfig;

pub struct LlmProvider(pub LlmClient);

#[async_trait]
impl EvaluationProvider for LlmProvider {
    fn name(&self) -> &'static str {
        "llm"
    }

    async fn evaluate(
        &self,
        mode: &ModeConfig,
        inputs: &EvaluationInputs,
    ) -> Result<RawEvaluation, ProviderError> {
        let prompt = build_prompt(mode, inputs)?;
        let system = format!("{EVALUATION_SYSTEM} {JSON_ONLY_SYSTEM}");
        let reply: Value = self.0.call_json(&prompt, &system).await?;
        interpret_reply(reply, mode, inputs)
    }
}

fn rubric_text(mode: &ModeConfig) -> String {
    mode.categories
        .iter()
        .map(|c| {
            format!(
                "- {} ({}, max_score {}): {}",
                c.key, c.name, c.max_score, c.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn build_prompt(mode: &ModeConfig, inputs: &EvaluationInputs) -> Result<String, ProviderError> {
    let rubric = format!("{}\n{SCORE_RANGE_INSTRUCTION}", rubric_text(mode));
    let prompt = match (mode.key.as_str(), inputs) {
        (
            "resume",
            EvaluationInputs::Resume {
                job_description,
                resume_text,
                ..
            },
        ) => fill_template(
            RESUME_EVALUATION_PROMPT,
            &[
                ("mode_name", mode.name.as_str()),
                ("rubric", rubric.as_str()),
                ("job_description", job_description.as_str()),
                ("resume_text", resume_text.as_str()),
            ],
        ),
        (
            "interview",
            EvaluationInputs::Interview {
                question,
                answer,
                job_role,
                job_description,
            },
        ) => fill_template(
            INTERVIEW_EVALUATION_PROMPT,
            &[
                ("mode_name", mode.name.as_str()),
                ("rubric", rubric.as_str()),
                ("job_role", job_role.as_str()),
                ("job_description", job_description.as_str()),
                ("question", question.as_str()),
                ("answer", answer.as_str()),
            ],
        ),
        _ => return Err(ProviderError::UnsupportedMode(mode.key.clone())),
    };
    Ok(prompt)
}

/// Substitutes `{name}` placeholders in one pass over the template, so braces inside the
/// substituted text are never read as placeholders. Unknown `{...}` spans are kept verbatim.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let hit = after.find('}').and_then(|end| {
            let name = &after[..end];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (end, *value))
        });
        match hit {
            Some((end, value)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Converts the model's JSON into a `RawEvaluation`. An `{"error": ...}` payload is a
/// provider failure, not an empty evaluation.
fn interpret_reply(
    reply: Value,
    mode: &ModeConfig,
    inputs: &EvaluationInputs,
) -> Result<RawEvaluation, ProviderError> {
    if let Some(message) = reply.get("error") {
        let message = message
            .as_str()
            .map(String::from)
            .unwrap_or_else(|| message.to_string());
        return Err(ProviderError::Reported(message));
    }

    let mut raw: RawEvaluation =
        serde_json::from_value(reply).map_err(|e| ProviderError::Malformed(e.to_string()))?;
    raw.timestamp = Utc::now();
    raw.metadata = Some(json!({
        "mode": mode.key,
        "provider": "llm",
        "model": crate::llm_client::MODEL,
        "input_length": inputs.input_length(),
    }));
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rubric::registry::ModeRegistry;

    fn interview_inputs() -> EvaluationInputs {
        EvaluationInputs::Interview {
            question: "What is ownership?".to_string(),
            answer: "Each value has a single owner.".to_string(),
            job_role: "Rust Developer".to_string(),
            job_description: "Systems work".to_string(),
        }
    }

    #[test]
    fn test_interview_prompt_includes_rubric_and_answer() {
        let registry = ModeRegistry::builtin().unwrap();
        let mode = registry.get("interview").unwrap();
        let prompt = build_prompt(mode, &interview_inputs()).unwrap();
        assert!(prompt.contains("- clarity (Clarity & Communication, max_score 10)"));
        assert!(prompt.contains("Each value has a single owner."));
        assert!(prompt.contains("JOB ROLE: Rust Developer"));
        assert!(!prompt.contains("{answer}"));
    }

    #[test]
    fn test_placeholders_in_user_text_are_not_expanded() {
        let registry = ModeRegistry::builtin().unwrap();
        let mode = registry.get("interview").unwrap();
        let inputs = EvaluationInputs::Interview {
            question: "Explain {rubric} please".to_string(),
            answer: "SECRET ANSWER".to_string(),
            job_role: "{answer}".to_string(),
            job_description: String::new(),
        };
        let prompt = build_prompt(mode, &inputs).unwrap();
        assert!(prompt.contains("JOB ROLE: {answer}"));
        assert!(prompt.contains("Explain {rubric} please"));
        assert_eq!(prompt.matches("SECRET ANSWER").count(), 1);
        // The JSON schema braces survive untouched.
        assert!(prompt.contains(r#""scores": { "<category_key>": number }"#));
    }

    #[test]
    fn test_prompt_rejects_mismatched_inputs() {
        let registry = ModeRegistry::builtin().unwrap();
        let mode = registry.get("resume").unwrap();
        assert!(matches!(
            build_prompt(mode, &interview_inputs()),
            Err(ProviderError::UnsupportedMode(_))
        ));
    }

    #[test]
    fn test_reply_with_scores_becomes_raw_evaluation() {
        let registry = ModeRegistry::builtin().unwrap();
        let mode = registry.get("interview").unwrap();
        let raw = interpret_reply(
            json!({
                "scores": { "clarity": 8, "relevance": 7.5, "accuracy": 9, "confidence": 6 },
                "overall_score": 76.3,
                "strengths": ["Concise"],
                "improvements": ["Add an example"]
            }),
            mode,
            &interview_inputs(),
        )
        .unwrap();
        assert_eq!(raw.scores.unwrap()["relevance"], 7.5);
        assert_eq!(raw.overall_score, Some(76.3));
        assert_eq!(raw.metadata.unwrap()["provider"], "llm");
    }

    #[test]
    fn test_error_payload_is_provider_failure() {
        let registry = ModeRegistry::builtin().unwrap();
        let mode = registry.get("interview").unwrap();
        let err = interpret_reply(
            json!({ "error": "quota exceeded" }),
            mode,
            &interview_inputs(),
        )
        .unwrap_err();
        assert!(matches!(err, ProviderError::Reported(ref m) if m == "quota exceeded"));
    }

    #[test]
    fn test_wrongly_typed_reply_is_malformed() {
        let registry = ModeRegistry::builtin().unwrap();
        let mode = registry.get("interview").unwrap();
        let err = interpret_reply(json!({ "scores": "high" }), mode, &interview_inputs())
            .unwrap_err();
        assert!(matches!(err, ProviderError::Malformed(_)));
    }
}
