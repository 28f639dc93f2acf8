//! LLM extraction — turns one raw opportunity snippet into the structured
//! fields. Parse failures never abort a run; the fallback record keeps the
//! raw text so a later re-run can do better.

use serde::Deserialize;
use tracing::warn;

use crate::ingest::prompts::{EXTRACT_PROMPT_TEMPLATE, EXTRACT_SYSTEM};
use crate::ingest::truncate_chars;
use crate::llm_client::LlmClient;

const FALLBACK_DESCRIPTION_CHARS: usize = 400;

/// Raw LLM output before vocabulary normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractedOpportunity {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
}

/// Extracts structured fields for one snippet. On any LLM or parse failure,
/// degrades to a stub built from the file name and truncated raw text.
pub async fn extract_opportunity(
    llm: &LlmClient,
    file_name: &str,
    raw_text: &str,
    allowed_skills: &[String],
    allowed_interests: &[String],
) -> ExtractedOpportunity {
    let prompt = EXTRACT_PROMPT_TEMPLATE
        .replace("{skills}", &join_or(allowed_skills, "No skills provided"))
        .replace(
            "{interests}",
            &join_or(allowed_interests, "No interests provided"),
        )
        .replace("{file_name}", file_name)
        .replace("{raw_text}", raw_text.trim());

    match llm
        .call_json::<ExtractedOpportunity>(&prompt, EXTRACT_SYSTEM)
        .await
    {
        Ok(extracted) => extracted,
        Err(e) => {
            warn!("Failed to parse LLM output for {file_name}: {e}");
            ExtractedOpportunity {
                title: file_name.to_string(),
                description: truncate_chars(raw_text.trim(), FALLBACK_DESCRIPTION_CHARS),
                ..Default::default()
            }
        }
    }
}

fn join_or(values: &[String], fallback: &str) -> String {
    if values.is_empty() {
        fallback.to_string()
    } else {
        values.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracted_opportunity_deserializes_with_defaults() {
        let extracted: ExtractedOpportunity =
            serde_json::from_str(r#"{"title": "Dog Walker"}"#).unwrap();
        assert_eq!(extracted.title, "Dog Walker");
        assert!(extracted.description.is_empty());
        assert!(extracted.skills.is_empty());
    }

    #[test]
    fn test_join_or_uses_fallback_for_empty_list() {
        assert_eq!(join_or(&[], "nothing"), "nothing");
        assert_eq!(
            join_or(&["a".to_string(), "b".to_string()], "nothing"),
            "a, b"
        );
    }
}
