//! Index-backed intent matching — the core engine behind the match endpoint.
//!
//! Pipeline for one query: extract intent → look up candidates per term →
//! score and rank → join against the store and truncate. Pure given the
//! snapshot: no I/O, no shared mutable state, bounded work.

pub mod assembler;
pub mod handlers;
pub mod index;
pub mod intent;
pub mod matcher;
pub mod snapshot;
pub mod store;

use crate::matching::assembler::ResultPayload;
use crate::matching::snapshot::Snapshot;

/// Runs the whole matching pipeline for one query against one snapshot.
///
/// `limit` is clamped into [1, 25], defaulting to 8. An empty query (or one
/// with no recognizable vocabulary) still yields results via the unscored
/// store-order fallback.
pub fn find_opportunities(snapshot: &Snapshot, query: &str, limit: Option<usize>) -> ResultPayload {
    let limit = matcher::clamp_limit(limit);
    let intent = intent::extract_intent(query, &snapshot.skills, &snapshot.interests);
    let ranked = matcher::rank(&intent, snapshot, limit);
    assembler::assemble(query, intent, ranked, limit, &snapshot.store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::index::TermIndex;
    use crate::matching::store::OpportunityStore;
    use crate::models::opportunity::Opportunity;

    fn make_opportunity(title: &str, skills: &[&str], interests: &[&str]) -> Opportunity {
        Opportunity {
            title: title.to_string(),
            description: format!("{title} description"),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            interests: interests.iter().map(|s| s.to_string()).collect(),
            metadata: Default::default(),
        }
    }

    /// The shelter fixture: A carries both tags, B only the skill, C only
    /// the interest.
    fn shelter_snapshot() -> Snapshot {
        let store = OpportunityStore::from_records([
            (
                "a".to_string(),
                make_opportunity("Shelter All-Rounder", &["animal care"], &["shelter support"]),
            ),
            (
                "b".to_string(),
                make_opportunity("Dog Walker", &["animal care"], &[]),
            ),
            (
                "c".to_string(),
                make_opportunity("Front Desk", &[], &["shelter support"]),
            ),
        ]);
        Snapshot::new(
            store,
            TermIndex::from_terms("skills", vec![("animal care", vec!["a", "b"])]),
            TermIndex::from_terms("interests", vec![("shelter support", vec!["a", "c"])]),
        )
    }

    #[test]
    fn test_shelter_query_ranks_dual_match_first() {
        let snapshot = shelter_snapshot();
        let payload = find_opportunities(&snapshot, "weekend animal care and shelter support volunteer", Some(5));

        assert_eq!(payload.stats.available_matches, 3);
        assert_eq!(payload.matches[0].id, "a");
        assert_eq!(payload.matches[0].score, 2.0);
        assert_eq!(payload.matches[1].id, "b");
        assert_eq!(payload.matches[2].id, "c");
        assert_eq!(payload.stats.skill_terms_matched, 1);
        assert_eq!(payload.stats.interest_terms_matched, 1);
    }

    #[test]
    fn test_repeated_queries_are_byte_identical() {
        let snapshot = shelter_snapshot();
        let first = find_opportunities(&snapshot, "animal care please", Some(10));
        let second = find_opportunities(&snapshot, "animal care please", Some(10));

        let a = serde_json::to_string(&first).unwrap();
        let b = serde_json::to_string(&second).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_limit_is_clamped_to_bounds() {
        let snapshot = shelter_snapshot();

        let over = find_opportunities(&snapshot, "animal care", Some(100));
        assert_eq!(over.stats.requested_limit, 25);

        let under = find_opportunities(&snapshot, "", Some(0));
        assert_eq!(under.stats.requested_limit, 1);
        assert_eq!(under.matches.len(), 1);
    }

    #[test]
    fn test_empty_query_returns_unscored_fallback_in_store_order() {
        let snapshot = shelter_snapshot();
        let payload = find_opportunities(&snapshot, "", Some(2));

        assert_eq!(payload.matches.len(), 2);
        assert_eq!(payload.matches[0].id, "a");
        assert_eq!(payload.matches[1].id, "b");
        assert!(payload.matches.iter().all(|m| m.fallback && m.score == 0.0));
        assert!(payload.intent.skills.is_empty());
    }

    #[test]
    fn test_unrecognized_vocabulary_also_falls_back() {
        let snapshot = shelter_snapshot();
        let payload = find_opportunities(&snapshot, "quantum basket weaving", Some(3));

        assert_eq!(payload.matches.len(), 3);
        assert!(payload.matches.iter().all(|m| m.fallback));
    }

    #[test]
    fn test_index_store_skew_is_survivable() {
        // "animal care" also lists a ghost id with no backing record.
        let store = OpportunityStore::from_records([(
            "a".to_string(),
            make_opportunity("Shelter All-Rounder", &["animal care"], &[]),
        )]);
        let snapshot = Snapshot::new(
            store,
            TermIndex::from_terms("skills", vec![("animal care", vec!["a", "ghost"])]),
            TermIndex::from_terms("interests", vec![]),
        );

        let payload = find_opportunities(&snapshot, "animal care", Some(5));
        assert_eq!(payload.matches.len(), 1);
        assert_eq!(payload.stats.available_matches, 1);
    }
}
