use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One structured volunteer opportunity, as written to `<id>.json` by the
/// ingestion binary. The record identity is the file stem; it is not stored
/// inside the document itself.
///
/// Records are immutable once stored — the matching engine only ever reads
/// them. Fields beyond the four structured ones (`source_file`, `model`,
/// `thumbprint`, `source_excerpt`, anything a future ingester adds) are
/// carried verbatim in `metadata`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(flatten)]
    pub metadata: BTreeMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_preserves_free_form_metadata() {
        let raw = json!({
            "title": "Food Bank Helper",
            "description": "Sort and pack donations.",
            "skills": ["logistics"],
            "interests": ["food security"],
            "source_file": "foodbank",
            "model": "claude-sonnet-4-5",
            "thumbprint": "abc123"
        });

        let opp: Opportunity = serde_json::from_value(raw).unwrap();
        assert_eq!(opp.title, "Food Bank Helper");
        assert_eq!(opp.skills, vec!["logistics"]);
        assert_eq!(opp.metadata.get("model").unwrap(), "claude-sonnet-4-5");
        assert_eq!(opp.metadata.get("source_file").unwrap(), "foodbank");
    }

    #[test]
    fn test_missing_tag_arrays_default_to_empty() {
        let raw = json!({
            "title": "Dog Walker",
            "description": "Walk shelter dogs."
        });

        let opp: Opportunity = serde_json::from_value(raw).unwrap();
        assert!(opp.skills.is_empty());
        assert!(opp.interests.is_empty());
        assert!(opp.metadata.is_empty());
    }

    #[test]
    fn test_round_trip_keeps_metadata_flat() {
        let raw = json!({
            "title": "STEM Tutor",
            "description": "Tutor middle schoolers.",
            "skills": ["teaching"],
            "interests": ["education"],
            "source_excerpt": "Looking for tutors..."
        });

        let opp: Opportunity = serde_json::from_value(raw.clone()).unwrap();
        let back = serde_json::to_value(&opp).unwrap();
        assert_eq!(back, raw);
    }
}
