use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::matching::snapshot::SnapshotCell;
use crate::summarize::Summarizer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Current store + index snapshot. Swapped wholesale on reload; queries
    /// clone the inner `Arc` and never see a partial update.
    pub snapshots: Arc<SnapshotCell>,
    pub llm: LlmClient,
    /// Pluggable summarizer backend. Default: `LlmSummarizer` over the
    /// shared client; tests swap in a stub.
    pub summarizer: Arc<dyn Summarizer>,
    pub config: Config,
}
