//! Intent Extractor — derives skill and interest terms from a free-text query,
//! constrained to the vocabulary the term indexes already know.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::matching::index::TermIndex;

/// The terms recognized in one query. Transient — derived per request,
/// never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Intent {
    pub skills: BTreeSet<String>,
    pub interests: BTreeSet<String>,
}

impl Intent {
    /// True when no term matched in either category. Triggers the matcher's
    /// unscored fallback.
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty() && self.interests.is_empty()
    }
}

/// Extracts the intent for `query` against both vocabularies.
///
/// Matching rules:
/// - the query is lowercased and tokenized on non-alphanumeric boundaries;
/// - a single-word term matches only as a whole token ("art" never matches
///   inside "cartography");
/// - a multi-word term matches as a contiguous token run;
/// - a phrase registered in both vocabularies lands in both intent sets.
///
/// An empty or unrecognized query yields an empty intent, which is a valid
/// outcome, not an error.
pub fn extract_intent(query: &str, skills: &TermIndex, interests: &TermIndex) -> Intent {
    let query_tokens = tokenize(query);
    Intent {
        skills: matching_terms(&query_tokens, skills),
        interests: matching_terms(&query_tokens, interests),
    }
}

fn matching_terms(query_tokens: &[String], index: &TermIndex) -> BTreeSet<String> {
    index
        .known_terms()
        .filter(|term| {
            let term_tokens = tokenize(term);
            !term_tokens.is_empty() && contains_phrase(query_tokens, &term_tokens)
        })
        .map(String::from)
        .collect()
}

/// Lowercased tokens split on any non-alphanumeric boundary.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Whether `needle` appears as a contiguous run inside `haystack`.
fn contains_phrase(haystack: &[String], needle: &[String]) -> bool {
    if needle.len() > haystack.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|w| w == needle)
}
