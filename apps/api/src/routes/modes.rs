use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::rubric::registry::ModeConfig;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ModesResponse {
    pub modes: Vec<ModeConfig>,
}

/// GET /api/v1/modes
pub async fn handle_list_modes(State(state): State<AppState>) -> Json<ModesResponse> {
    Json(ModesResponse {
        modes: state.formatter.registry().list().to_vec(),
    })
}

/// GET /api/v1/modes/:mode
pub async fn handle_get_mode(
    State(state): State<AppState>,
    Path(mode): Path<String>,
) -> Result<Json<ModeConfig>, AppError> {
    Ok(Json(state.formatter.registry().get(&mode)?.clone()))
}
