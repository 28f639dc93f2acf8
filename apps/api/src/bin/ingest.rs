//! Batch ingestion binary. Converts raw opportunity text snippets into
//! structured JSON documents and rebuilds both term index files. The serving
//! binary picks the new artifacts up via `POST /api/v1/snapshot/reload`.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use api::config::require_env;
use api::ingest::{self, IngestOptions};
use api::llm_client::{LlmClient, DEFAULT_MODEL};

#[derive(Parser)]
#[command(name = "ingest", about = "Process raw opportunity text files into JSON")]
struct IngestArgs {
    /// Directory containing input .txt files.
    #[arg(long, default_value = "data/opportunities_raw")]
    raw_dir: PathBuf,

    /// Directory where opportunity JSON documents are written.
    #[arg(long, default_value = "data/opportunities")]
    output_dir: PathBuf,

    /// Directory where the index files are written.
    #[arg(long, default_value = "data/index")]
    index_dir: PathBuf,

    /// Path to the skills vocabulary JSON list.
    #[arg(long, default_value = "data/skills.json")]
    skills: PathBuf,

    /// Path to the interests vocabulary JSON list.
    #[arg(long, default_value = "data/interest.json")]
    interests: PathBuf,

    /// Chat model used for extraction.
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = IngestArgs::parse();
    let llm = LlmClient::new(require_env("ANTHROPIC_API_KEY")?).with_model(args.model);

    let options = IngestOptions {
        raw_dir: args.raw_dir,
        output_dir: args.output_dir,
        index_dir: args.index_dir,
        skills_path: args.skills,
        interests_path: args.interests,
    };

    let report = ingest::run(&options, &llm).await?;
    info!(
        "Ingestion finished: {} written, {} skipped, {} skill terms, {} interest terms",
        report.written, report.skipped, report.skill_terms, report.interest_terms
    );
    Ok(())
}
