//! Hiring funnel metrics: pure functions over parsed ATS records.

use serde::Serialize;

use crate::ats::models::{Candidate, Placement, StageCategory, Vacancy};
use crate::companies::grouping::group_by_company;
use crate::silver_medalists::detection::MIN_SILVER_STAGE;
use crate::vacancies::dashboard::effective_company;

/// Placements per current stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StageCounts {
    pub applied: usize,
    pub screening: usize,
    pub interview: usize,
    pub offer: usize,
    pub hired: usize,
}

impl StageCounts {
    fn add(&mut self, stage: StageCategory) {
        match stage {
            StageCategory::Applied => self.applied += 1,
            StageCategory::Screening => self.screening += 1,
            StageCategory::Interview => self.interview += 1,
            StageCategory::Offer => self.offer += 1,
            StageCategory::Hired => self.hired += 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VacancyMetrics {
    pub job_id: i64,
    pub title: String,
    pub company_name: String,
    pub candidates: usize,
    pub stages: StageCounts,
    pub hires: usize,
    pub disqualified: usize,
    /// hires / candidates, 0.0 without candidates.
    pub conversion_rate: f64,
    pub avg_days_to_hire: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyMetrics {
    pub company_name: String,
    pub vacancies: usize,
    pub candidates: usize,
    pub hires: usize,
    pub conversion_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsOverview {
    pub total_vacancies: usize,
    pub total_candidates: usize,
    pub total_placements: usize,
    pub total_hires: usize,
    pub conversion_rate: f64,
    pub avg_days_to_hire: Option<f64>,
    /// Never-hired candidates who reached an interview or later.
    pub silver_medalists: usize,
    pub vacancies: Vec<VacancyMetrics>,
    pub companies: Vec<CompanyMetrics>,
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn days_to_hire(placement: &Placement) -> Option<f64> {
    let (created, hired) = (placement.created_at?, placement.hired_at?);
    let seconds = hired.signed_duration_since(created).num_seconds();
    (seconds >= 0).then(|| seconds as f64 / 86_400.0)
}

fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

pub fn compute_vacancy_metrics(vacancy: &Vacancy, candidates: &[Candidate]) -> VacancyMetrics {
    let placements: Vec<&Placement> = candidates
        .iter()
        .flat_map(|c| c.placements.iter())
        .filter(|p| p.job_id == vacancy.job_id)
        .collect();

    let mut stages = StageCounts::default();
    for p in &placements {
        stages.add(p.stage);
    }

    let hire_days: Vec<f64> = placements.iter().filter_map(|p| days_to_hire(p)).collect();
    let hires = stages.hired;

    VacancyMetrics {
        job_id: vacancy.job_id,
        title: vacancy.title.clone(),
        company_name: effective_company(vacancy, None).1,
        candidates: placements.len(),
        hires,
        disqualified: placements.iter().filter(|p| p.disqualified).count(),
        conversion_rate: ratio(hires, placements.len()),
        avg_days_to_hire: average(&hire_days),
        stages,
    }
}

pub fn compute_overview(vacancies: &[Vacancy], candidates: &[Candidate]) -> AnalyticsOverview {
    let metrics: Vec<VacancyMetrics> = vacancies
        .iter()
        .map(|v| compute_vacancy_metrics(v, candidates))
        .collect();

    let total_placements: usize = metrics.iter().map(|m| m.candidates).sum();
    let total_hires: usize = metrics.iter().map(|m| m.hires).sum();

    let all_hire_days: Vec<f64> = candidates
        .iter()
        .flat_map(|c| c.placements.iter())
        .filter(|p| vacancies.iter().any(|v| v.job_id == p.job_id))
        .filter_map(days_to_hire)
        .collect();

    let silver_medalists = candidates
        .iter()
        .filter(|c| !c.was_hired())
        .filter(|c| c.placements.iter().any(|p| p.stage >= MIN_SILVER_STAGE))
        .count();

    let companies = group_by_company(metrics.iter(), |m| m.company_name.as_str())
        .into_iter()
        .map(|group| {
            let candidates: usize = group.items.iter().map(|m| m.candidates).sum();
            let hires: usize = group.items.iter().map(|m| m.hires).sum();
            CompanyMetrics {
                company_name: group.name,
                vacancies: group.items.len(),
                candidates,
                hires,
                conversion_rate: ratio(hires, candidates),
            }
        })
        .collect();

    AnalyticsOverview {
        total_vacancies: vacancies.len(),
        total_candidates: candidates.len(),
        total_placements,
        total_hires,
        conversion_rate: ratio(total_hires, total_placements),
        avg_days_to_hire: average(&all_hire_days),
        silver_medalists,
        vacancies: metrics,
        companies,
    }
}
