// Hiring analytics over ATS placements.

pub mod handlers;
pub mod metrics;
