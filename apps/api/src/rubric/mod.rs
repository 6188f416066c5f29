// Rubric engine: mode registry, percentage bands, phrase book and the formatter.
// Nothing in here performs I/O; providers and storage live in `evaluation` and `history`.

pub mod bands;
pub mod formatter;
pub mod models;
pub mod phrases;
pub mod registry;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::evaluation::ProviderError;

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("Unknown evaluation mode: {0}")]
    UnknownMode(String),

    #[error("Invalid evaluation data: {0}")]
    InvalidEvaluation(String),

    #[error("Evaluation failed at {at}: {source}")]
    EvaluationFailed {
        source: ProviderError,
        at: DateTime<Utc>,
    },
}

impl EvaluationError {
    pub fn failed(source: ProviderError) -> Self {
        EvaluationError::EvaluationFailed {
            source,
            at: Utc::now(),
        }
    }
}
