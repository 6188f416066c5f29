//! Submission pipeline: mode lookup → provider (bounded) → formatter → history.

use std::time::Instant;

use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::evaluation::{evaluate_with_timeout, EvaluationInputs};
use crate::history::HistoryRecord;
use crate::rubric::models::FormattedEvaluation;
use crate::rubric::EvaluationError;
use crate::session::SessionId;
use crate::state::AppState;

pub async fn run_evaluation(
    state: &AppState,
    session: &SessionId,
    inputs: EvaluationInputs,
) -> Result<FormattedEvaluation, AppError> {
    let mode_key = inputs.mode_key();
    let mode = state.formatter.registry().get(mode_key)?;

    let started = Instant::now();
    info!(
        mode = mode_key,
        session = session.as_str(),
        provider = state.provider.name(),
        input_bytes = inputs.input_length(),
        "Evaluation started"
    );

    let raw = evaluate_with_timeout(
        state.provider.as_ref(),
        mode,
        &inputs,
        state.config.provider_timeout,
    )
    .await
    .map_err(|e| {
        warn!(
            mode = mode_key,
            session = session.as_str(),
            "Provider failed after {}ms: {e}",
            started.elapsed().as_millis()
        );
        EvaluationError::failed(e)
    })?;

    let evaluation = state.formatter.format(&raw, mode_key).map_err(|e| {
        error!(mode = mode_key, "Formatter rejected provider output: {e}");
        e
    })?;

    info!(
        mode = mode_key,
        session = session.as_str(),
        total = evaluation.total(),
        grade = evaluation.letter_grade().unwrap_or("-"),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Evaluation finished"
    );

    let record = HistoryRecord::new(session.as_str(), inputs, evaluation.clone());
    state.history.append(session.as_str(), record).await?;

    Ok(evaluation)
}
