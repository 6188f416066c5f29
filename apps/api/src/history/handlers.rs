use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::history::HistoryRecord;
use crate::session::SessionId;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub session_id: String,
    pub records: Vec<HistoryRecord>,
}

/// GET /api/v1/history
///
/// All evaluations submitted under the caller's session, newest first.
pub async fn handle_history(
    State(state): State<AppState>,
    session: SessionId,
) -> Result<Json<HistoryResponse>, AppError> {
    let records = state.history.list(session.as_str()).await?;
    Ok(Json(HistoryResponse {
        session_id: session.into_inner(),
        records,
    }))
}
