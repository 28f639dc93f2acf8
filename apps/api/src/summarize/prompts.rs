// All LLM prompt constants for the summarizer pipeline.

/// System prompt for result summarization — friendly prose, no JSON.
pub const SUMMARY_SYSTEM: &str =
    "You are helping someone find volunteer opportunities. \
    Write warm, practical plain text. \
    Do NOT use markdown headers or code fences. \
    Do NOT invent opportunities that are not in the listing.";

/// Summary prompt template. Replace `{query}`, `{intent}`, and `{listing}`
/// before sending.
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"You are helping someone find volunteer opportunities.

Their request: {query}
Recognized skills and interests: {intent}

Here are the options, best match first:

{listing}

Write:
- A short friendly overview
- Then a bullet list of the 3-5 best options with:
  - title
  - why it fits the request
  - which skills or interests it exercises
"#;
