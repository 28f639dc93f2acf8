//! The summarizer pipeline — an explicit finite-state machine over
//! `SummaryState`. Each stage tag maps to one handler function; a plain loop
//! drives the state to `Done`. Only the Summarize stage touches the LLM.

use serde::Serialize;

use crate::errors::AppError;
use crate::matching::assembler::ResultPayload;
use crate::matching::find_opportunities;
use crate::matching::snapshot::Snapshot;
use crate::summarize::prompts::SUMMARY_PROMPT_TEMPLATE;
use crate::summarize::Summarizer;

/// At most this many matches are rendered into the LLM listing, regardless
/// of the requested result limit.
const LISTING_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SummaryStage {
    Match,
    Compose,
    Summarize,
    Done,
}

/// Everything the pipeline accumulates while running. Stages only ever fill
/// fields in; nothing is mutated after `Done`.
#[derive(Debug)]
pub struct SummaryState {
    pub query: String,
    pub limit: Option<usize>,
    pub stage: SummaryStage,
    pub payload: Option<ResultPayload>,
    pub listing: Option<String>,
    pub summary: Option<String>,
}

impl SummaryState {
    pub fn new(query: String, limit: Option<usize>) -> Self {
        Self {
            query,
            limit,
            stage: SummaryStage::Match,
            payload: None,
            listing: None,
            summary: None,
        }
    }
}

/// Drives the pipeline to completion: Match → Compose → Summarize → Done.
/// When matching yields nothing to summarize, the pipeline short-circuits
/// with a canned message and makes no LLM call.
pub async fn run(
    query: String,
    limit: Option<usize>,
    snapshot: &Snapshot,
    summarizer: &dyn Summarizer,
) -> Result<SummaryState, AppError> {
    let mut state = SummaryState::new(query, limit);
    loop {
        state = match state.stage {
            SummaryStage::Match => step_match(state, snapshot),
            SummaryStage::Compose => step_compose(state),
            SummaryStage::Summarize => step_summarize(state, summarizer).await?,
            SummaryStage::Done => return Ok(state),
        };
    }
}

fn step_match(mut state: SummaryState, snapshot: &Snapshot) -> SummaryState {
    let payload = find_opportunities(snapshot, &state.query, state.limit);

    state.stage = if payload.matches.is_empty() {
        state.summary = Some(format!(
            "No volunteer opportunities found for \"{}\".",
            state.query
        ));
        SummaryStage::Done
    } else {
        SummaryStage::Compose
    };
    state.payload = Some(payload);
    state
}

fn step_compose(mut state: SummaryState) -> SummaryState {
    // step_match always sets the payload before handing over.
    let lines: Vec<String> = state
        .payload
        .iter()
        .flat_map(|p| p.matches.iter())
        .take(LISTING_LIMIT)
        .enumerate()
        .map(|(i, m)| {
            format!(
                "{}. {} (score {:.1}) — skills: {}; interests: {} — {}",
                i + 1,
                m.opportunity.title,
                m.score,
                join_or_dash(&m.opportunity.skills),
                join_or_dash(&m.opportunity.interests),
                m.opportunity.description
            )
        })
        .collect();

    state.listing = Some(lines.join("\n"));
    state.stage = SummaryStage::Summarize;
    state
}

async fn step_summarize(
    mut state: SummaryState,
    summarizer: &dyn Summarizer,
) -> Result<SummaryState, AppError> {
    let intent_terms = state
        .payload
        .iter()
        .flat_map(|p| p.intent.skills.iter().chain(p.intent.interests.iter()))
        .cloned()
        .collect::<Vec<_>>();

    let prompt = SUMMARY_PROMPT_TEMPLATE
        .replace("{query}", &state.query)
        .replace(
            "{intent}",
            &if intent_terms.is_empty() {
                "not recognized — showing a general starting point".to_string()
            } else {
                intent_terms.join(", ")
            },
        )
        .replace("{listing}", state.listing.as_deref().unwrap_or(""));

    state.summary = Some(summarizer.summarize(&prompt).await?);
    state.stage = SummaryStage::Done;
    Ok(state)
}

fn join_or_dash(values: &[String]) -> String {
    if values.is_empty() {
        "—".to_string()
    } else {
        values.join(", ")
    }
}
