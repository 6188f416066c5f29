//! Axum route handlers for evaluation submissions and question generation.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::evaluation::pipeline::run_evaluation;
use crate::evaluation::questions::{generate_questions, GeneratedQuestions};
use crate::evaluation::EvaluationInputs;
use crate::extraction::{extract_resume_text, ExtractionError};
use crate::rubric::models::FormattedEvaluation;
use crate::session::SessionId;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct InterviewRequest {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub job_role: String,
    #[serde(default)]
    pub job_description: String,
}

/// Extra fields such as `job_description` are accepted and ignored.
#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    pub job_role: String,
    #[serde(default = "default_difficulty")]
    pub difficulty_level: String,
    #[serde(default = "default_question_count")]
    pub number_of_questions: usize,
}

fn default_difficulty() -> String {
    "medium".to_string()
}

fn default_question_count() -> usize {
    3
}

#[derive(Debug, Serialize)]
pub struct EvaluationResponse {
    pub inputs: EvaluationInputs,
    pub evaluation: FormattedEvaluation,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/evaluate/resume
///
/// Multipart form with `job_description` (text) and `resume_file` (PDF or .txt).
pub async fn handle_evaluate_resume(
    State(state): State<AppState>,
    session: SessionId,
    mut multipart: Multipart,
) -> Result<Json<EvaluationResponse>, AppError> {
    let mut job_description = String::new();
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "job_description" => job_description = field.text().await?,
            "resume_file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                upload = Some((filename, field.bytes().await?));
            }
            _ => {}
        }
    }

    let (filename, content) = upload.ok_or(ExtractionError::MissingFile)?;
    let max_bytes = state.config.max_upload_bytes;
    let name = filename.clone();
    let (resume_text, _) =
        tokio::task::spawn_blocking(move || extract_resume_text(&name, &content, max_bytes))
            .await
            .map_err(|e| ExtractionError::Pdf(format!("extraction task failed: {e}")))??;

    let inputs = EvaluationInputs::Resume {
        job_description,
        resume_text,
        filename: Some(filename),
    };
    let evaluation = run_evaluation(&state, &session, inputs.clone()).await?;
    Ok(Json(EvaluationResponse { inputs, evaluation }))
}

/// POST /api/v1/evaluate/interview
pub async fn handle_evaluate_interview(
    State(state): State<AppState>,
    session: SessionId,
    Json(request): Json<InterviewRequest>,
) -> Result<Json<EvaluationResponse>, AppError> {
    if request.question.trim().is_empty() {
        return Err(AppError::Validation("question cannot be empty".to_string()));
    }
    if request.answer.trim().is_empty() {
        return Err(AppError::Validation("answer cannot be empty".to_string()));
    }

    let inputs = EvaluationInputs::Interview {
        question: request.question,
        answer: request.answer,
        job_role: request.job_role,
        job_description: request.job_description,
    };
    let evaluation = run_evaluation(&state, &session, inputs.clone()).await?;
    Ok(Json(EvaluationResponse { inputs, evaluation }))
}

/// POST /api/v1/interview/questions
///
/// Practice questions for a role at the requested difficulty. Not persisted.
pub async fn handle_generate_questions(
    Json(request): Json<QuestionRequest>,
) -> Result<Json<GeneratedQuestions>, AppError> {
    if request.job_role.trim().is_empty() {
        return Err(AppError::Validation("job_role cannot be empty".to_string()));
    }
    Ok(Json(generate_questions(
        &request.job_role,
        &request.difficulty_level,
        request.number_of_questions,
    )))
}
