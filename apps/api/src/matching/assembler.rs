//! Result Assembler — joins ranked ids back to full opportunity records and
//! produces the response payload with summary statistics.

use serde::Serialize;
use tracing::debug;

use crate::matching::intent::Intent;
use crate::matching::matcher::Match;
use crate::matching::store::OpportunityStore;
use crate::models::opportunity::Opportunity;

/// One ranked match expanded with the full record it points at.
#[derive(Debug, Clone, Serialize)]
pub struct MatchDetail {
    pub id: String,
    pub score: f64,
    pub matched_skills: Vec<String>,
    pub matched_interests: Vec<String>,
    pub fallback: bool,
    pub opportunity: Opportunity,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchStats {
    /// The limit actually applied (after clamping).
    pub requested_limit: usize,
    /// Joinable candidates before truncation. Matches dropped for
    /// index/store skew do not count.
    pub available_matches: usize,
    pub skill_terms_matched: usize,
    pub interest_terms_matched: usize,
}

/// The full response for one query: echoed query text, the extracted intent
/// for transparency, expanded matches, and stats.
#[derive(Debug, Clone, Serialize)]
pub struct ResultPayload {
    pub query: String,
    pub intent: Intent,
    pub matches: Vec<MatchDetail>,
    pub stats: MatchStats,
}

/// Joins `ranked` against the store and truncates to `limit`.
///
/// A match whose id is missing from the store (index/store skew after a
/// partial re-ingestion) is dropped from the output and excluded from
/// `available_matches`.
pub fn assemble(
    query: &str,
    intent: Intent,
    ranked: Vec<Match>,
    limit: usize,
    store: &OpportunityStore,
) -> ResultPayload {
    let joined: Vec<MatchDetail> = ranked
        .into_iter()
        .filter_map(|m| match store.get(&m.id) {
            Some(opportunity) => Some(MatchDetail {
                id: m.id,
                score: m.score,
                matched_skills: m.matched_skills,
                matched_interests: m.matched_interests,
                fallback: m.fallback,
                opportunity: opportunity.clone(),
            }),
            None => {
                debug!("Dropping match {}: id not present in store", m.id);
                None
            }
        })
        .collect();

    let stats = MatchStats {
        requested_limit: limit,
        available_matches: joined.len(),
        skill_terms_matched: intent.skills.len(),
        interest_terms_matched: intent.interests.len(),
    };

    let mut matches = joined;
    matches.truncate(limit);

    ResultPayload {
        query: query.to_string(),
        intent,
        matches,
        stats,
    }
}
