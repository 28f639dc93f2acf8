use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use api::config::Config;
use api::llm_client::LlmClient;
use api::matching::snapshot::SnapshotCell;
use api::routes::build_router;
use api::state::AppState;
use api::summarize::LlmSummarizer;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting volunteer matching API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client + summarizer backend
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    let summarizer = Arc::new(LlmSummarizer(llm.clone()));
    info!("LLM client initialized (model: {})", llm.model());

    // Load the initial snapshot. A failed load is NOT fatal: the service
    // starts degraded and answers 503 on query routes until a reload after
    // ingestion succeeds.
    let snapshots = Arc::new(SnapshotCell::empty());
    match snapshots.reload_from(&config.opportunities_dir, &config.index_dir) {
        Ok(snapshot) => info!("Initial snapshot v{} loaded", snapshot.version),
        Err(e) => warn!("No snapshot loaded at startup: {e:#}"),
    }

    // Build app state
    let state = AppState {
        snapshots,
        llm,
        summarizer,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
