//! Opportunity Store — read-only view over a directory of opportunity JSON documents.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::models::opportunity::Opportunity;

/// All opportunity records, keyed by stable identifier (the JSON file stem).
///
/// Loaded eagerly when a snapshot is built; never mutated afterwards. A
/// malformed document is skipped with a warning rather than failing the
/// whole load.
#[derive(Debug, Clone, Default)]
pub struct OpportunityStore {
    records: BTreeMap<String, Opportunity>,
}

impl OpportunityStore {
    /// Loads every `*.json` document in `dir`. Index artifacts
    /// (`*.idx.json`) are ignored in case both kinds share a directory.
    pub fn load(dir: &Path) -> Result<Self> {
        let entries = fs::read_dir(dir)
            .with_context(|| format!("Cannot read opportunities directory {}", dir.display()))?;

        let mut records = BTreeMap::new();
        for entry in entries {
            let path = entry?.path();
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(n) => n,
                None => continue,
            };
            if !name.ends_with(".json") || name.ends_with(".idx.json") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            match fs::read_to_string(&path)
                .map_err(anyhow::Error::from)
                .and_then(|raw| serde_json::from_str::<Opportunity>(&raw).map_err(Into::into))
            {
                Ok(record) => {
                    records.insert(id.to_string(), record);
                }
                Err(e) => {
                    warn!("Skipping malformed opportunity document {name}: {e}");
                }
            }
        }

        info!(
            "Loaded {} opportunity records from {}",
            records.len(),
            dir.display()
        );
        Ok(Self { records })
    }

    /// Builds a store directly from records (used by snapshot reload tests
    /// and anywhere a store exists without backing files).
    pub fn from_records(records: impl IntoIterator<Item = (String, Opportunity)>) -> Self {
        Self {
            records: records.into_iter().collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Opportunity> {
        self.records.get(id)
    }

    /// All records in ascending id order. This ordering is what makes the
    /// unscored fallback and tie-breaking reproducible across queries.
    pub fn all(&self) -> impl Iterator<Item = (&str, &Opportunity)> {
        self.records.iter().map(|(id, opp)| (id.as_str(), opp))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) {
        let mut f = File::create(dir.join(name)).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn test_load_reads_documents_and_skips_malformed() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "dogs.json",
            r#"{"title": "Dog Walker", "description": "Walk dogs.", "skills": ["animal care"], "interests": []}"#,
        );
        write_file(dir.path(), "broken.json", "{not json");
        write_file(dir.path(), "notes.txt", "ignore me");

        let store = OpportunityStore::load(dir.path()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("dogs").unwrap().title, "Dog Walker");
        assert!(store.get("broken").is_none());
    }

    #[test]
    fn test_load_ignores_index_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "skill.idx.json",
            r#"{"label": "skills", "index": {}}"#,
        );
        let store = OpportunityStore::load(dir.path()).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(OpportunityStore::load(&missing).is_err());
    }

    #[test]
    fn test_all_iterates_in_ascending_id_order() {
        let dir = tempfile::tempdir().unwrap();
        for id in ["charlie", "alpha", "bravo"] {
            write_file(
                dir.path(),
                &format!("{id}.json"),
                r#"{"title": "T", "description": "D"}"#,
            );
        }
        let store = OpportunityStore::load(dir.path()).unwrap();
        let ids: Vec<&str> = store.all().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["alpha", "bravo", "charlie"]);
    }
}
