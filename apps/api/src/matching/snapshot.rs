//! Snapshot — an immutable, atomically-swappable view of the opportunity store
//! plus both term indexes. Queries run against exactly one snapshot; reloads
//! build a replacement off to the side and swap the whole reference.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use anyhow::Result;
use tracing::info;

use crate::errors::AppError;
use crate::matching::index::{FieldKind, TermIndex};
use crate::matching::store::OpportunityStore;

pub const SKILL_INDEX_FILE: &str = "skill.idx.json";
pub const INTEREST_INDEX_FILE: &str = "interest.idx.json";

/// One consistent view of the three on-disk artifacts. Read-only for its
/// whole lifetime; concurrent queries share it behind an `Arc`.
#[derive(Debug)]
pub struct Snapshot {
    pub store: OpportunityStore,
    pub skills: TermIndex,
    pub interests: TermIndex,
    /// Assigned by the cell on install; strictly increasing across reloads.
    pub version: u64,
}

impl Snapshot {
    pub fn new(store: OpportunityStore, skills: TermIndex, interests: TermIndex) -> Self {
        Self {
            store,
            skills,
            interests,
            version: 0,
        }
    }

    /// Builds a snapshot from the opportunities directory and the two index
    /// files. Any missing artifact fails the whole build — a half-loaded
    /// snapshot must never serve queries.
    pub fn load(opportunities_dir: &Path, index_dir: &Path) -> Result<Self> {
        let store = OpportunityStore::load(opportunities_dir)?;
        let skills = TermIndex::load(&index_dir.join(SKILL_INDEX_FILE))?;
        let interests = TermIndex::load(&index_dir.join(INTEREST_INDEX_FILE))?;
        Ok(Self::new(store, skills, interests))
    }

    pub fn index(&self, kind: FieldKind) -> &TermIndex {
        match kind {
            FieldKind::Skill => &self.skills,
            FieldKind::Interest => &self.interests,
        }
    }
}

/// Process-wide holder for the current snapshot.
///
/// The lock guards only the reference get/swap, never query work: readers
/// clone the `Arc` once and drop the guard, so in-flight queries keep the
/// snapshot they started with while a reload installs a new one.
#[derive(Debug)]
pub struct SnapshotCell {
    inner: RwLock<Option<Arc<Snapshot>>>,
    next_version: AtomicU64,
}

impl SnapshotCell {
    /// A cell with no snapshot. Queries fail with `IndexUnavailable` until
    /// one is installed.
    pub fn empty() -> Self {
        Self {
            inner: RwLock::new(None),
            next_version: AtomicU64::new(1),
        }
    }

    /// The current snapshot, or `IndexUnavailable` when none was ever
    /// loaded. Callers surface the latter as a 503.
    pub fn current(&self) -> Result<Arc<Snapshot>, AppError> {
        // A poisoned lock only ever held a fully-built Arc; reuse it.
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        guard.clone().ok_or_else(|| {
            AppError::IndexUnavailable(
                "no snapshot loaded; run ingestion and reload the snapshot".to_string(),
            )
        })
    }

    /// Installs a freshly-built snapshot, assigning it the next version.
    pub fn install(&self, mut snapshot: Snapshot) -> Arc<Snapshot> {
        snapshot.version = self.next_version.fetch_add(1, Ordering::SeqCst);
        let snapshot = Arc::new(snapshot);

        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(snapshot.clone());
        drop(guard);

        info!(
            "Snapshot v{} installed: {} opportunities, {} skill terms, {} interest terms",
            snapshot.version,
            snapshot.store.len(),
            snapshot.skills.term_count(),
            snapshot.interests.term_count()
        );
        snapshot
    }

    /// Rebuilds from disk and swaps atomically. On failure the previous
    /// snapshot stays in place untouched.
    pub fn reload_from(
        &self,
        opportunities_dir: &Path,
        index_dir: &Path,
    ) -> Result<Arc<Snapshot>> {
        let snapshot = Snapshot::load(opportunities_dir, index_dir)?;
        Ok(self.install(snapshot))
    }
}
