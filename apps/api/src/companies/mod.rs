// Company identity heuristics. The ATS guarantees no stable company key, so
// grouping relies on normalized-name matching.

pub mod grouping;
pub mod normalize;
