//! Matcher/Ranker — turns an extracted intent into a deterministic, scored
//! ordering of candidate opportunities.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::matching::index::FieldKind;
use crate::matching::intent::Intent;
use crate::matching::snapshot::Snapshot;

pub const DEFAULT_LIMIT: usize = 8;
pub const MIN_LIMIT: usize = 1;
pub const MAX_LIMIT: usize = 25;

/// A scored association between the query's intent and one candidate
/// opportunity. Lives only inside a single request's ranking computation.
#[derive(Debug, Clone, Serialize)]
pub struct Match {
    pub id: String,
    pub score: f64,
    pub matched_skills: Vec<String>,
    pub matched_interests: Vec<String>,
    /// Set when this entry came from the unscored store-order fallback
    /// rather than a term match.
    pub fallback: bool,
}

impl Match {
    fn unscored(id: &str, fallback: bool) -> Self {
        Self {
            id: id.to_string(),
            score: 0.0,
            matched_skills: Vec::new(),
            matched_interests: Vec::new(),
            fallback,
        }
    }
}

/// Clamps a requested result limit into [MIN_LIMIT, MAX_LIMIT]; absent means
/// DEFAULT_LIMIT. Out-of-range values are corrected, never rejected.
pub fn clamp_limit(requested: Option<usize>) -> usize {
    match requested {
        None => DEFAULT_LIMIT,
        Some(n) => n.clamp(MIN_LIMIT, MAX_LIMIT),
    }
}

/// Ranks all candidate opportunities for `intent` against the snapshot.
///
/// Scoring: +1.0 per distinct matched skill term, +1.0 per distinct matched
/// interest term. Ties break on ascending id, so repeated queries against an
/// unchanged snapshot are byte-for-byte reproducible.
///
/// Returns the FULL ordering — truncation happens at assembly, after the
/// store join, so index/store skew never hides viable candidates. The one
/// exception is the empty-intent fallback, which by definition returns the
/// first `limit` store records with score 0.0.
pub fn rank(intent: &Intent, snapshot: &Snapshot, limit: usize) -> Vec<Match> {
    if intent.is_empty() {
        return snapshot
            .store
            .all()
            .take(limit)
            .map(|(id, _)| Match::unscored(id, true))
            .collect();
    }

    let mut by_id: BTreeMap<String, Match> = BTreeMap::new();

    for term in &intent.skills {
        for id in snapshot.index(FieldKind::Skill).candidates_for(term) {
            let m = by_id
                .entry(id.clone())
                .or_insert_with(|| Match::unscored(id, false));
            m.score += 1.0;
            m.matched_skills.push(term.clone());
        }
    }
    for term in &intent.interests {
        for id in snapshot.index(FieldKind::Interest).candidates_for(term) {
            let m = by_id
                .entry(id.clone())
                .or_insert_with(|| Match::unscored(id, false));
            m.score += 1.0;
            m.matched_interests.push(term.clone());
        }
    }

    // BTreeMap iteration is already id-ascending; an explicit tie-break keeps
    // the ordering contract independent of that detail.
    let mut ranked: Vec<Match> = by_id.into_values().collect();
    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::index::TermIndex;
    use crate::matching::store::OpportunityStore;
    use crate::models::opportunity::Opportunity;
    use std::collections::BTreeSet;

    fn make_opportunity(title: &str) -> Opportunity {
        Opportunity {
            title: title.to_string(),
            description: format!("{title} description"),
            skills: vec![],
            interests: vec![],
            metadata: Default::default(),
        }
    }

    fn make_snapshot(ids: &[&str], skills: Vec<(&str, Vec<&str>)>, interests: Vec<(&str, Vec<&str>)>) -> Snapshot {
        let store = OpportunityStore::from_records(
            ids.iter()
                .map(|id| (id.to_string(), make_opportunity(id))),
        );
        Snapshot::new(
            store,
            TermIndex::from_terms("skills", skills),
            TermIndex::from_terms("interests", interests),
        )
    }

    fn intent(skills: &[&str], interests: &[&str]) -> Intent {
        Intent {
            skills: skills.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
            interests: interests
                .iter()
                .map(|s| s.to_string())
                .collect::<BTreeSet<_>>(),
        }
    }

    #[test]
    fn test_both_category_match_outranks_single_category() {
        // A carries both tags, B only the skill, C only the interest.
        let snapshot = make_snapshot(
            &["a", "b", "c"],
            vec![("animal care", vec!["a", "b"])],
            vec![("shelter support", vec!["a", "c"])],
        );
        let ranked = rank(
            &intent(&["animal care"], &["shelter support"]),
            &snapshot,
            5,
        );

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].id, "a");
        assert_eq!(ranked[0].score, 2.0);
        // B and C tie at 1.0 — ordered by id.
        assert_eq!(ranked[1].id, "b");
        assert_eq!(ranked[2].id, "c");
        assert_eq!(ranked[1].score, 1.0);
        assert_eq!(ranked[2].score, 1.0);
    }

    #[test]
    fn test_each_distinct_term_contributes_once() {
        let snapshot = make_snapshot(
            &["a"],
            vec![("gardening", vec!["a"]), ("composting", vec!["a"])],
            vec![],
        );
        let ranked = rank(&intent(&["gardening", "composting"], &[]), &snapshot, 5);
        assert_eq!(ranked[0].score, 2.0);
        assert_eq!(
            ranked[0].matched_skills,
            vec!["composting", "gardening"],
            "matched terms accumulate in sorted intent order"
        );
    }

    #[test]
    fn test_empty_intent_falls_back_to_store_order() {
        let snapshot = make_snapshot(&["c", "a", "b"], vec![], vec![]);
        let ranked = rank(&Intent::default(), &snapshot, 2);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].id, "a");
        assert_eq!(ranked[1].id, "b");
        assert!(ranked.iter().all(|m| m.fallback && m.score == 0.0));
    }

    #[test]
    fn test_fallback_respects_small_store() {
        let snapshot = make_snapshot(&["only"], vec![], vec![]);
        let ranked = rank(&Intent::default(), &snapshot, 8);
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn test_unmatched_terms_contribute_nothing() {
        let snapshot = make_snapshot(&["a"], vec![("gardening", vec!["a"])], vec![]);
        let ranked = rank(&intent(&["gardening", "welding"], &[]), &snapshot, 5);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].score, 1.0);
    }

    #[test]
    fn test_clamp_limit_bounds() {
        assert_eq!(clamp_limit(None), DEFAULT_LIMIT);
        assert_eq!(clamp_limit(Some(0)), MIN_LIMIT);
        assert_eq!(clamp_limit(Some(100)), MAX_LIMIT);
        assert_eq!(clamp_limit(Some(12)), 12);
    }
}
