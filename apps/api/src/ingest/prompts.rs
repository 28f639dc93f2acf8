// All LLM prompt constants for the ingestion pipeline.

/// System prompt for snippet extraction — enforces JSON-only output.
pub const EXTRACT_SYSTEM: &str =
    "You convert volunteer opportunity descriptions into JSON. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT invent details that are not in the source text.";

/// Extraction prompt template. Replace `{skills}`, `{interests}`,
/// `{file_name}`, and `{raw_text}` before sending.
pub const EXTRACT_PROMPT_TEMPLATE: &str = r#"Convert the following volunteer opportunity description into JSON.

Use only these skills when possible:
{skills}

Use only these interest areas when possible:
{interests}

Source file: {file_name}

Opportunity text:
---
{raw_text}
---

Return ONLY valid JSON with this exact shape:
{
  "title": string,
  "description": string,
  "skills": [string, ...],
  "interests": [string, ...]
}

Rules:
- Stay concise and factual.
- Prefer skills/interests from the provided lists; omit ones you cannot map.
- If info is missing, leave arrays empty rather than inventing details.
"#;
