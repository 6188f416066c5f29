pub mod health;
pub mod modes;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::evaluation::handlers;
use crate::history::handlers::handle_history;
use crate::session::handle_new_session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.body_limit();

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/sessions", post(handle_new_session))
        // Mode registry
        .route("/api/v1/modes", get(modes::handle_list_modes))
        .route("/api/v1/modes/:mode", get(modes::handle_get_mode))
        // Evaluations
        .route(
            "/api/v1/evaluate/resume",
            post(handlers::handle_evaluate_resume),
        )
        .route(
            "/api/v1/evaluate/interview",
            post(handlers::handle_evaluate_interview),
        )
        .route(
            "/api/v1/interview/questions",
            post(handlers::handle_generate_questions),
        )
        .route("/api/v1/history", get(handle_history))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
