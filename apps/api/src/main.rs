mod config;
mod errors;
mod evaluation;
mod extraction;
mod history;
mod llm_client;
mod routes;
mod rubric;
mod session;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, HistoryBackend, ProviderKind};
use crate::evaluation::heuristic::HeuristicProvider;
use crate::evaluation::llm::LlmProvider;
use crate::evaluation::EvaluationProvider;
use crate::history::{FileHistoryStore, HistoryStore, MemoryHistoryStore};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::rubric::formatter::RubricFormatter;
use crate::rubric::registry::ModeRegistry;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http=info",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Evaluator API v{}", env!("CARGO_PKG_VERSION"));

    let registry = Arc::new(ModeRegistry::builtin().context("built-in mode registry is invalid")?);
    for mode in registry.list() {
        info!(
            "Registered mode '{}' ({} categories, max {})",
            mode.key,
            mode.categories.len(),
            mode.total_max
        );
    }
    let formatter = Arc::new(RubricFormatter::new(registry));

    // HeuristicProvider by default; swap via SCORING_PROVIDER=llm
    let provider: Arc<dyn EvaluationProvider> = match config.provider {
        ProviderKind::Heuristic => Arc::new(HeuristicProvider::new(config.provider_delay)),
        ProviderKind::Llm => {
            let key = config
                .anthropic_api_key
                .clone()
                .context("ANTHROPIC_API_KEY is required for the llm provider")?;
            let llm = LlmClient::new(key)?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Arc::new(LlmProvider(llm))
        }
    };
    info!(
        "Scoring provider: {} (timeout {:?})",
        provider.name(),
        config.provider_timeout
    );

    let history: Arc<dyn HistoryStore> = match config.history_backend {
        HistoryBackend::File => {
            let store = FileHistoryStore::new(config.data_dir.clone());
            info!("History stored under {}", store.root().display());
            Arc::new(store)
        }
        HistoryBackend::Memory => {
            warn!("HISTORY_STORE=memory: evaluation history is lost on restart");
            Arc::new(MemoryHistoryStore::default())
        }
    };

    let state = AppState {
        config: config.clone(),
        formatter,
        provider,
        history,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
