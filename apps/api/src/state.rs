use std::sync::Arc;

use crate::config::Config;
use crate::evaluation::EvaluationProvider;
use crate::history::HistoryStore;
use crate::rubric::formatter::RubricFormatter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Formatter over the process-wide mode registry.
    pub formatter: Arc<RubricFormatter>,
    /// Pluggable scorer. Default: HeuristicProvider. Swap via SCORING_PROVIDER.
    pub provider: Arc<dyn EvaluationProvider>,
    pub history: Arc<dyn HistoryStore>,
}
