use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::evaluation::ProviderError;
use crate::extraction::ExtractionError;
use crate::history::HistoryError;
use crate::rubric::EvaluationError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error("Malformed upload: {0}")]
    Multipart(#[from] MultipartError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut timestamp = None;

        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Session(msg) => (StatusCode::UNAUTHORIZED, "SESSION_REQUIRED", msg.clone()),
            AppError::Evaluation(EvaluationError::UnknownMode(mode)) => (
                StatusCode::NOT_FOUND,
                "UNKNOWN_MODE",
                format!("Unknown evaluation mode: {mode}"),
            ),
            AppError::Evaluation(EvaluationError::InvalidEvaluation(msg)) => {
                tracing::error!("Invalid evaluation from provider: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INVALID_EVALUATION",
                    "The scoring service returned no scores".to_string(),
                )
            }
            AppError::Evaluation(EvaluationError::EvaluationFailed { source, at }) => {
                tracing::warn!("Evaluation failed: {source}");
                timestamp = Some(at.to_rfc3339());
                match source {
                    ProviderError::Timeout(_) => (
                        StatusCode::GATEWAY_TIMEOUT,
                        "EVALUATION_TIMEOUT",
                        source.to_string(),
                    ),
                    _ => (
                        StatusCode::BAD_GATEWAY,
                        "EVALUATION_FAILED",
                        source.to_string(),
                    ),
                }
            }
            AppError::Extraction(ExtractionError::TooLarge { .. }) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "FILE_TOO_LARGE",
                self.to_string(),
            ),
            AppError::Extraction(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_FILE",
                e.to_string(),
            ),
            AppError::History(HistoryError::InvalidSession) => (
                StatusCode::UNAUTHORIZED,
                "SESSION_REQUIRED",
                "Invalid session ID. Please start a new session.".to_string(),
            ),
            AppError::History(e) => {
                tracing::error!("History store error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Multipart(e) => (e.status(), "MALFORMED_UPLOAD", e.body_text()),
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(ts) = timestamp {
            error["timestamp"] = json!(ts);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_unknown_mode_is_client_error() {
        let response =
            AppError::from(EvaluationError::UnknownMode("essay".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "UNKNOWN_MODE");
    }

    #[tokio::test]
    async fn test_provider_failure_carries_timestamp() {
        let err = EvaluationError::failed(ProviderError::Reported("quota".to_string()));
        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "EVALUATION_FAILED");
        assert!(body["error"]["message"].as_str().unwrap().contains("quota"));
        assert!(body["error"]["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_timeout_maps_to_gateway_timeout() {
        let err = EvaluationError::failed(ProviderError::Timeout(Duration::from_secs(30)));
        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn test_invalid_evaluation_hides_details() {
        let err = EvaluationError::InvalidEvaluation("missing scores".to_string());
        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "INVALID_EVALUATION");
        assert!(body["error"].get("timestamp").is_none());
    }
}
