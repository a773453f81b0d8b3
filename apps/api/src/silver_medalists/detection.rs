use std::collections::HashMap;

use serde::Serialize;

use crate::ats::models::{Candidate, StageCategory, Vacancy};

/// Earliest stage that counts as "late": the candidate was at least interviewed.
pub const MIN_SILVER_STAGE: StageCategory = StageCategory::Interview;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SilverMedalist {
    pub candidate_id: i64,
    pub name: String,
    pub email: Option<String>,
    pub past_job_id: i64,
    pub past_job_title: String,
    pub furthest_stage: StageCategory,
    pub stage_name: Option<String>,
}

/// Candidates worth resurfacing for `target_job_id`.
///
/// A candidate qualifies when they were never hired anywhere, have not applied
/// to the target vacancy, and reached at least `MIN_SILVER_STAGE` on another
/// vacancy. Each candidate appears once, with their furthest placement.
pub fn find_silver_medalists(
    candidates: &[Candidate],
    vacancies: &[Vacancy],
    target_job_id: i64,
) -> Vec<SilverMedalist> {
    let titles: HashMap<i64, &str> = vacancies
        .iter()
        .map(|v| (v.job_id, v.title.as_str()))
        .collect();

    let mut medalists: Vec<SilverMedalist> = candidates
        .iter()
        .filter(|c| !c.was_hired())
        .filter(|c| c.placements.iter().all(|p| p.job_id != target_job_id))
        .filter_map(|c| {
            let best = c
                .placements
                .iter()
                .filter(|p| p.stage >= MIN_SILVER_STAGE)
                .max_by_key(|p| (p.stage, p.created_at))?;

            Some(SilverMedalist {
                candidate_id: c.id,
                name: c.name.clone(),
                email: c.email.clone(),
                past_job_id: best.job_id,
                past_job_title: titles
                    .get(&best.job_id)
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| format!("Vacancy {}", best.job_id)),
                furthest_stage: best.stage,
                stage_name: best.stage_name.clone(),
            })
        })
        .collect();

    medalists.sort_by(|a, b| {
        b.furthest_stage
            .cmp(&a.furthest_stage)
            .then_with(|| a.name.cmp(&b.name))
    });
    medalists
}
