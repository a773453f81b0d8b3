/// System prompt for silver-medalist matching.
pub const MATCH_SYSTEM: &str = "You are an experienced recruiter at a staffing agency. \
    You compare former candidates against a new vacancy and judge how well they fit.";

/// Matching prompt. Replace `{vacancy_title}`, `{company}` and `{candidates_json}` before sending.
pub const MATCH_PROMPT_TEMPLATE: &str = r#"A new vacancy has opened:

Title: {vacancy_title}
Client company: {company}

The following candidates reached a late interview stage for an earlier vacancy but were not hired:

{candidates_json}

Select the candidates that are a plausible fit for the new vacancy, based on how close
their earlier vacancy is to the new one and how far they got in that process.

Return a JSON object with this EXACT schema:
{
  "matches": [
    {"candidate_id": 123, "score": 85, "reason": "Interviewed twice for a near-identical planning role"}
  ]
}

Rules:
- score is an integer from 0 (no fit) to 100 (excellent fit)
- leave out candidates that do not fit at all
- reason is one short sentence
"#;
