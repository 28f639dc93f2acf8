//! Term Index — inverted index from a normalized vocabulary term to the set of
//! opportunity ids tagged with it. Built externally by the ingestion binary and
//! loaded here as an immutable value.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which tag field an index covers. Every snapshot carries one index per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Skill,
    Interest,
}

/// On-disk shape of an index file, as written by the ingestion binary:
/// `{label, generated_at, total_terms, index: {term: [{title, file, source_file}]}}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexFile {
    pub label: String,
    pub generated_at: DateTime<Utc>,
    pub total_terms: usize,
    pub index: BTreeMap<String, Vec<IndexEntry>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub title: String,
    /// Opportunity document file name, e.g. `foodbank.json`. The record id is
    /// the stem.
    pub file: String,
    #[serde(default)]
    pub source_file: Option<String>,
}

/// An in-memory inverted index for a single field kind. Terms are normalized
/// to lowercase on load; lookups normalize the same way, so callers never see
/// case mismatches. Ids are NOT validated against the store here — dangling
/// references are tolerated downstream at assembly time.
#[derive(Debug, Clone, Default)]
pub struct TermIndex {
    label: String,
    generated_at: Option<DateTime<Utc>>,
    terms: BTreeMap<String, BTreeSet<String>>,
}

impl TermIndex {
    /// Loads an index file (`skill.idx.json` / `interest.idx.json`).
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Cannot read index file {}", path.display()))?;
        let file: IndexFile = serde_json::from_str(&raw)
            .with_context(|| format!("Malformed index file {}", path.display()))?;

        let mut terms: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (term, entries) in file.index {
            let normalized = term.trim().to_lowercase();
            if normalized.is_empty() {
                continue;
            }
            let ids = terms.entry(normalized).or_default();
            for entry in entries {
                if let Some(id) = Path::new(&entry.file).file_stem().and_then(|s| s.to_str()) {
                    ids.insert(id.to_string());
                }
            }
        }

        Ok(Self {
            label: file.label,
            generated_at: Some(file.generated_at),
            terms,
        })
    }

    /// Builds an index from literal term → ids pairs (reload tests, fixtures).
    pub fn from_terms(label: &str, entries: Vec<(&str, Vec<&str>)>) -> Self {
        let mut terms: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (term, ids) in entries {
            terms
                .entry(term.trim().to_lowercase())
                .or_default()
                .extend(ids.into_iter().map(String::from));
        }
        Self {
            label: label.to_string(),
            generated_at: None,
            terms,
        }
    }

    /// Opportunity ids carrying `term`. An unknown term yields an empty
    /// iterator, not an error.
    pub fn candidates_for(&self, term: &str) -> impl Iterator<Item = &String> {
        self.terms
            .get(&term.trim().to_lowercase())
            .into_iter()
            .flatten()
    }

    /// The full normalized vocabulary, in lexicographic order. The intent
    /// extractor matches queries against exactly this set.
    pub fn known_terms(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn generated_at(&self) -> Option<DateTime<Utc>> {
        self.generated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const INDEX_JSON: &str = r#"{
        "label": "skills",
        "generated_at": "2025-11-03T18:22:10Z",
        "total_terms": 2,
        "index": {
            "Animal Care": [
                {"title": "Dog Walker", "file": "dogs.json", "source_file": "dogs"},
                {"title": "Cat Foster", "file": "cats.json", "source_file": "cats"}
            ],
            "Logistics": [
                {"title": "Food Bank Helper", "file": "foodbank.json"}
            ]
        }
    }"#;

    fn write_index(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skill.idx.json");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_normalizes_terms_and_derives_ids_from_file_names() {
        let (_dir, path) = write_index(INDEX_JSON);
        let index = TermIndex::load(&path).unwrap();

        assert_eq!(index.label(), "skills");
        assert_eq!(index.term_count(), 2);

        let ids: Vec<&String> = index.candidates_for("animal care").collect();
        assert_eq!(ids, vec!["cats", "dogs"]);
    }

    #[test]
    fn test_candidates_for_is_case_insensitive() {
        let (_dir, path) = write_index(INDEX_JSON);
        let index = TermIndex::load(&path).unwrap();
        assert_eq!(index.candidates_for("LOGISTICS").count(), 1);
        assert_eq!(index.candidates_for("  Logistics  ").count(), 1);
    }

    #[test]
    fn test_unknown_term_yields_empty_not_error() {
        let index = TermIndex::from_terms("skills", vec![("gardening", vec!["a"])]);
        assert_eq!(index.candidates_for("cooking").count(), 0);
    }

    #[test]
    fn test_known_terms_are_lowercase() {
        let index = TermIndex::from_terms(
            "interests",
            vec![("Shelter Support", vec!["a"]), ("education", vec!["b"])],
        );
        let terms: Vec<&str> = index.known_terms().collect();
        assert_eq!(terms, vec!["education", "shelter support"]);
    }

    #[test]
    fn test_malformed_index_file_is_an_error() {
        let (_dir, path) = write_index("{broken");
        assert!(TermIndex::load(&path).is_err());
    }
}
