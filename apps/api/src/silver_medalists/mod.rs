// Silver medalists: candidates who reached a late stage on an earlier vacancy
// without being hired, resurfaced against a new vacancy via LLM matching.

pub mod detection;
pub mod handlers;
pub mod matcher;
pub mod prompts;
