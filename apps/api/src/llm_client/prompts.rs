// Shared prompt fragments. Each feature that calls the LLM keeps its own
// prompts.rs alongside it.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Keeps the model from inventing candidates or vacancy details.
pub const NO_INVENTION_INSTRUCTION: &str = "\
    Only refer to candidates by the numeric ids given in the input. \
    Never invent candidates, ids, experience or qualifications that are not in the input.";
