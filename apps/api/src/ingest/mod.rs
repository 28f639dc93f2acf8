//! Batch ingestion — converts raw opportunity text snippets into the
//! structured JSON documents and index files the matching engine consumes.
//!
//! Runs as its own binary (`ingest`); the serving binary never writes these
//! artifacts. Unchanged inputs are detected by content thumbprint and
//! skipped, so re-runs only pay for new or edited snippets.

pub mod extract;
pub mod indexer;
pub mod prompts;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use tracing::{info, warn};

use crate::llm_client::LlmClient;
use crate::matching::snapshot::{INTEREST_INDEX_FILE, SKILL_INDEX_FILE};
use crate::models::opportunity::Opportunity;

use self::extract::ExtractedOpportunity;

const DESCRIPTION_FALLBACK_CHARS: usize = 800;
const SOURCE_EXCERPT_CHARS: usize = 1200;

#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub raw_dir: PathBuf,
    pub output_dir: PathBuf,
    pub index_dir: PathBuf,
    pub skills_path: PathBuf,
    pub interests_path: PathBuf,
}

#[derive(Debug, Default)]
pub struct IngestReport {
    pub written: usize,
    pub skipped: usize,
    pub skill_terms: usize,
    pub interest_terms: usize,
}

/// Processes every `.txt` file in the raw directory, then rebuilds both
/// index files from the full output directory.
pub async fn run(options: &IngestOptions, llm: &LlmClient) -> Result<IngestReport> {
    let skills = load_reference_list(&options.skills_path, "skills")?;
    let interests = load_reference_list(&options.interests_path, "interests")?;
    let skill_map = VocabularyMap::new(&skills);
    let interest_map = VocabularyMap::new(&interests);

    let mut txt_files: Vec<PathBuf> = fs::read_dir(&options.raw_dir)
        .with_context(|| format!("Cannot read raw directory {}", options.raw_dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("txt"))
        .collect();
    txt_files.sort();

    if txt_files.is_empty() {
        info!(
            "No .txt files found in {}; nothing to process",
            options.raw_dir.display()
        );
        return Ok(IngestReport::default());
    }

    fs::create_dir_all(&options.output_dir)?;
    let mut report = IngestReport::default();

    for txt_file in &txt_files {
        let Some(stem) = txt_file.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let raw_text = fs::read_to_string(txt_file)?;
        let print = thumbprint(&raw_text);
        let output_path = options.output_dir.join(format!("{stem}.json"));

        if is_unchanged(&output_path, &print) {
            info!("Skipping {stem}: thumbprint unchanged");
            report.skipped += 1;
            continue;
        }

        let extracted = extract::extract_opportunity(llm, stem, &raw_text, &skills, &interests).await;
        let record =
            normalize_opportunity(extracted, &raw_text, stem, &skill_map, &interest_map, llm.model(), &print);

        fs::write(&output_path, serde_json::to_string_pretty(&record)?)?;
        info!("Wrote {}", output_path.display());
        report.written += 1;
    }

    fs::create_dir_all(&options.index_dir)?;
    let (skill_index, interest_index) = indexer::build_indexes(&options.output_dir)?;
    report.skill_terms = skill_index.len();
    report.interest_terms = interest_index.len();
    indexer::write_index_file(&options.index_dir.join(SKILL_INDEX_FILE), "skills", skill_index)?;
    indexer::write_index_file(
        &options.index_dir.join(INTEREST_INDEX_FILE),
        "interests",
        interest_index,
    )?;

    Ok(report)
}

/// Stable content hash used to detect unchanged raw inputs across runs.
pub fn thumbprint(text: &str) -> String {
    blake3::hash(text.as_bytes()).to_hex().to_string()
}

fn is_unchanged(output_path: &Path, print: &str) -> bool {
    let Ok(raw) = fs::read_to_string(output_path) else {
        return false;
    };
    let Ok(existing) = serde_json::from_str::<Opportunity>(&raw) else {
        return false;
    };
    existing
        .metadata
        .get("thumbprint")
        .and_then(Value::as_str)
        .is_some_and(|existing_print| existing_print == print)
}

/// Loads a flat JSON list of reference terms. A missing or non-list file is
/// an error; an empty list is only a warning (extraction then maps nothing).
pub fn load_reference_list(path: &Path, label: &str) -> Result<Vec<String>> {
    if !path.exists() {
        bail!("Missing {label} file at {}", path.display());
    }

    let raw = fs::read_to_string(path)?;
    let raw = raw.trim();
    if raw.is_empty() {
        warn!("{label} file at {} is empty", path.display());
        return Ok(Vec::new());
    }

    let data: Vec<Value> = serde_json::from_str(raw)
        .with_context(|| format!("{label} file must contain a JSON list"))?;

    let cleaned: Vec<String> = data
        .into_iter()
        .map(|item| match item {
            Value::String(s) => s.trim().to_string(),
            other => other.to_string().trim().to_string(),
        })
        .filter(|value| !value.is_empty())
        .collect();

    if cleaned.is_empty() {
        warn!(
            "{label} list from {} did not contain any usable entries",
            path.display()
        );
    }
    Ok(cleaned)
}

/// Case-insensitive mapping from arbitrary extracted tags onto the allowed
/// vocabulary. Exact match wins; otherwise substring containment in either
/// direction, first vocabulary entry (file order) taking precedence.
#[derive(Debug, Clone)]
pub struct VocabularyMap {
    entries: Vec<(String, String)>, // (lowercase key, canonical term)
}

impl VocabularyMap {
    pub fn new(allowed: &[String]) -> Self {
        Self {
            entries: allowed
                .iter()
                .map(|term| (term.to_lowercase(), term.clone()))
                .collect(),
        }
    }

    pub fn match_term(&self, token: &str) -> Option<&str> {
        let token = token.trim().to_lowercase();
        if token.is_empty() || self.entries.is_empty() {
            return None;
        }
        if let Some((_, canonical)) = self.entries.iter().find(|(key, _)| *key == token) {
            return Some(canonical);
        }
        self.entries
            .iter()
            .find(|(key, _)| key.contains(&token) || token.contains(key.as_str()))
            .map(|(_, canonical)| canonical.as_str())
    }

    /// Maps every value onto the vocabulary, dropping unmappable ones and
    /// de-duplicating while preserving first-seen order.
    pub fn filter(&self, values: &[String]) -> Vec<String> {
        let mut filtered: Vec<String> = Vec::new();
        for value in values {
            if let Some(canonical) = self.match_term(value) {
                if !filtered.iter().any(|f| f == canonical) {
                    filtered.push(canonical.to_string());
                }
            }
        }
        filtered
    }
}

fn normalize_opportunity(
    extracted: ExtractedOpportunity,
    raw_text: &str,
    file_name: &str,
    skill_map: &VocabularyMap,
    interest_map: &VocabularyMap,
    model: &str,
    print: &str,
) -> Opportunity {
    let raw_trimmed = raw_text.trim();

    let title = match extracted.title.trim() {
        "" => file_name.to_string(),
        t => t.to_string(),
    };

    let mut description = extracted.description.trim().to_string();
    if description.is_empty() {
        description = truncate_chars(raw_trimmed, DESCRIPTION_FALLBACK_CHARS);
    }
    if description.is_empty() {
        description = "Description unavailable.".to_string();
    }

    let mut metadata = BTreeMap::new();
    metadata.insert("source_file".to_string(), Value::from(file_name));
    metadata.insert("model".to_string(), Value::from(model));
    metadata.insert("thumbprint".to_string(), Value::from(print));
    if !raw_trimmed.is_empty() {
        metadata.insert(
            "source_excerpt".to_string(),
            Value::from(truncate_chars(raw_trimmed, SOURCE_EXCERPT_CHARS)),
        );
    }

    Opportunity {
        title,
        description,
        skills: skill_map.filter(&extracted.skills),
        interests: interest_map.filter(&extracted.interests),
        metadata,
    }
}

/// Char-boundary-safe prefix (byte slicing would panic on multibyte text).
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
