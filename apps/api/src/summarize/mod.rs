//! Long-form summarization of a ranked result set.
//!
//! The branching shell around the LLM is an explicit finite-state pipeline
//! (stage tags → handler functions, see `pipeline`), not a graph abstraction.
//! The LLM itself sits behind the `Summarizer` trait so the pipeline is
//! testable without network access.

pub mod handlers;
pub mod pipeline;
pub mod prompts;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::llm_client::LlmClient;

/// The summarizer seam. Carried in `AppState` as `Arc<dyn Summarizer>`;
/// swap the backend without touching the pipeline or handlers.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, prompt: &str) -> Result<String, AppError>;
}

/// Production backend — one Claude call through the shared LLM client.
pub struct LlmSummarizer(pub LlmClient);

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(&self, prompt: &str) -> Result<String, AppError> {
        let response = self
            .0
            .call(prompt, prompts::SUMMARY_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Summary generation failed: {e}")))?;

        response
            .text()
            .map(str::to_string)
            .ok_or_else(|| AppError::Llm("Summary response had no text content".to_string()))
    }
}
