//! Index builder — rebuilds both inverted index files in full from the
//! output directory. There is no incremental update path; a rebuild is cheap
//! at this corpus size and keeps the files trivially consistent.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::Value;
use tracing::info;

use crate::matching::index::{IndexEntry, IndexFile};
use crate::models::opportunity::Opportunity;

pub type TermEntries = BTreeMap<String, Vec<IndexEntry>>;

/// Scans every opportunity document and groups entries by skill and by
/// interest term. Unparseable documents are skipped, mirroring the store's
/// tolerance at load time.
pub fn build_indexes(output_dir: &Path) -> Result<(TermEntries, TermEntries)> {
    let mut skill_index: TermEntries = BTreeMap::new();
    let mut interest_index: TermEntries = BTreeMap::new();

    let mut paths: Vec<_> = fs::read_dir(output_dir)
        .with_context(|| format!("Cannot read output directory {}", output_dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    paths.sort();

    for path in paths {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.ends_with(".json") || name.ends_with(".idx.json") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let Ok(raw) = fs::read_to_string(&path) else {
            continue;
        };
        let Ok(record) = serde_json::from_str::<Opportunity>(&raw) else {
            continue;
        };

        let entry = IndexEntry {
            title: if record.title.is_empty() {
                stem.to_string()
            } else {
                record.title.clone()
            },
            file: name.to_string(),
            source_file: Some(
                record
                    .metadata
                    .get("source_file")
                    .and_then(Value::as_str)
                    .unwrap_or(stem)
                    .to_string(),
            ),
        };

        append_entries(&mut skill_index, &record.skills, &entry);
        append_entries(&mut interest_index, &record.interests, &entry);
    }

    sort_entries(&mut skill_index);
    sort_entries(&mut interest_index);
    Ok((skill_index, interest_index))
}

fn append_entries(index: &mut TermEntries, terms: &[String], entry: &IndexEntry) {
    for term in terms {
        let cleaned = term.trim();
        if cleaned.is_empty() {
            continue;
        }
        index.entry(cleaned.to_string()).or_default().push(entry.clone());
    }
}

fn sort_entries(index: &mut TermEntries) {
    for entries in index.values_mut() {
        entries.sort_by_key(|e| e.title.to_lowercase());
    }
}

/// Writes one index file in the on-disk shape `TermIndex::load` reads back.
pub fn write_index_file(path: &Path, label: &str, index: TermEntries) -> Result<()> {
    let payload = IndexFile {
        label: label.to_string(),
        generated_at: Utc::now(),
        total_terms: index.len(),
        index,
    };
    fs::write(path, serde_json::to_string_pretty(&payload)?)
        .with_context(|| format!("Cannot write index file {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::index::TermIndex;
    use std::io::Write;

    fn write_doc(dir: &Path, name: &str, contents: &str) {
        let mut f = fs::File::create(dir.join(name)).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
    }

    fn seed_docs(dir: &Path) {
        write_doc(
            dir,
            "dogs.json",
            r#"{"title": "Dog Walker", "description": "D", "skills": ["Animal Care"], "interests": ["Shelter Support"], "source_file": "dogs"}"#,
        );
        write_doc(
            dir,
            "cats.json",
            r#"{"title": "Cat Foster", "description": "D", "skills": ["Animal Care"], "interests": []}"#,
        );
        write_doc(dir, "broken.json", "{nope");
        write_doc(dir, "skill.idx.json", r#"{"stale": true}"#);
    }

    #[test]
    fn test_build_indexes_groups_by_term() {
        let dir = tempfile::tempdir().unwrap();
        seed_docs(dir.path());

        let (skills, interests) = build_indexes(dir.path()).unwrap();
        assert_eq!(skills.len(), 1);
        assert_eq!(skills["Animal Care"].len(), 2);
        assert_eq!(interests["Shelter Support"].len(), 1);
    }

    #[test]
    fn test_entries_sorted_by_lowercased_title() {
        let dir = tempfile::tempdir().unwrap();
        seed_docs(dir.path());

        let (skills, _) = build_indexes(dir.path()).unwrap();
        let titles: Vec<&str> = skills["Animal Care"].iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Cat Foster", "Dog Walker"]);
    }

    #[test]
    fn test_source_file_falls_back_to_stem() {
        let dir = tempfile::tempdir().unwrap();
        seed_docs(dir.path());

        let (skills, _) = build_indexes(dir.path()).unwrap();
        let cats = skills["Animal Care"]
            .iter()
            .find(|e| e.file == "cats.json")
            .unwrap();
        assert_eq!(cats.source_file.as_deref(), Some("cats"));
    }

    #[test]
    fn test_written_index_round_trips_through_term_index() {
        let dir = tempfile::tempdir().unwrap();
        seed_docs(dir.path());

        let (skills, _) = build_indexes(dir.path()).unwrap();
        let path = dir.path().join("out.idx.json");
        write_index_file(&path, "skills", skills).unwrap();

        let loaded = TermIndex::load(&path).unwrap();
        assert_eq!(loaded.label(), "skills");
        let ids: Vec<&String> = loaded.candidates_for("animal care").collect();
        assert_eq!(ids, vec!["cats", "dogs"]);
        assert!(loaded.generated_at().is_some());
    }
}
