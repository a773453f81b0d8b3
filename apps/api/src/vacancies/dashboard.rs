//! Dashboard assembly — joins ATS vacancies with annotations and visibility rows.
//!
//! Flow: effective company → annotation lookup → calculated/display tier →
//! hide filter → fuzzy company grouping → sort (most urgent first).

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::ats::models::{Vacancy, VacancyStatus};
use crate::companies::grouping::group_by_company;
use crate::companies::normalize::extract_company_from_title;
use crate::models::annotation::{AnnotationKey, PriorityAnnotation};
use crate::models::visibility::VacancyVisibility;
use crate::priority::calculator::Priority;

pub const UNKNOWN_COMPANY: &str = "Onbekend";

/// Where a vacancy's company name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanySource {
    Assigned,
    Ats,
    Title,
    Unknown,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardVacancy {
    pub job_id: i64,
    pub company_id: i64,
    pub company_name: String,
    pub company_source: CompanySource,
    pub title: String,
    pub status: VacancyStatus,
    pub hidden: bool,
    pub calculated_priority: Priority,
    pub display_priority: Priority,
    pub annotation: Option<PriorityAnnotation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PriorityCounts {
    pub red: usize,
    pub orange: usize,
    pub green: usize,
}

impl PriorityCounts {
    fn add(&mut self, priority: Priority) {
        match priority {
            Priority::Red => self.red += 1,
            Priority::Orange => self.orange += 1,
            Priority::Green => self.green += 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardGroup {
    pub company_name: String,
    pub top_priority: Priority,
    pub counts: PriorityCounts,
    pub vacancies: Vec<DashboardVacancy>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub groups: Vec<DashboardGroup>,
    pub total_vacancies: usize,
    pub counts: PriorityCounts,
    /// Annotations whose vacancy no longer exists upstream. Kept, never deleted.
    pub orphaned_annotations: usize,
}

/// Company id and name used for grouping and annotation lookup.
pub fn effective_company(
    vacancy: &Vacancy,
    visibility: Option<&VacancyVisibility>,
) -> (i64, String, CompanySource) {
    let company_id = visibility
        .and_then(|v| v.assigned_company_id)
        .unwrap_or(vacancy.company_id);

    if let Some(name) = visibility
        .and_then(|v| v.assigned_company_name.as_deref())
        .filter(|n| !n.trim().is_empty())
    {
        return (company_id, name.trim().to_string(), CompanySource::Assigned);
    }
    if let Some(company) = &vacancy.company {
        return (company_id, company.name.clone(), CompanySource::Ats);
    }
    if let Some(name) = extract_company_from_title(&vacancy.title) {
        return (company_id, name, CompanySource::Title);
    }
    (company_id, UNKNOWN_COMPANY.to_string(), CompanySource::Unknown)
}

pub fn build_dashboard(
    vacancies: &[Vacancy],
    annotations: Vec<PriorityAnnotation>,
    visibility: &[VacancyVisibility],
    include_hidden: bool,
) -> Dashboard {
    let mut annotations: HashMap<AnnotationKey, PriorityAnnotation> =
        annotations.into_iter().map(|a| (a.key(), a)).collect();
    let visibility: HashMap<i64, &VacancyVisibility> =
        visibility.iter().map(|v| (v.job_id, v)).collect();

    let mut matched_keys: HashSet<AnnotationKey> = HashSet::new();
    let mut rows = Vec::with_capacity(vacancies.len());

    for vacancy in vacancies {
        let vis = visibility.get(&vacancy.job_id).copied();
        let (company_id, company_name, company_source) = effective_company(vacancy, vis);

        // Prefer the annotation for the effective company, then the ATS company.
        let key = [company_id, vacancy.company_id]
            .into_iter()
            .map(|company_id| AnnotationKey {
                job_id: vacancy.job_id,
                company_id,
            })
            .find(|k| annotations.contains_key(k));
        if let Some(k) = key {
            matched_keys.insert(k);
        }
        let annotation = key.and_then(|k| annotations.get(&k)).cloned();

        let hidden = vis.map(|v| v.hidden).unwrap_or(false);
        if hidden && !include_hidden {
            continue;
        }

        let calculated_priority = annotation
            .as_ref()
            .map(|a| a.calculated_priority)
            .unwrap_or(Priority::Green);
        let display_priority = annotation
            .as_ref()
            .map(|a| a.display_priority)
            .unwrap_or(calculated_priority);

        rows.push(DashboardVacancy {
            job_id: vacancy.job_id,
            company_id,
            company_name,
            company_source,
            title: vacancy.title.clone(),
            status: vacancy.status,
            hidden,
            calculated_priority,
            display_priority,
            annotation,
        });
    }

    annotations.retain(|k, _| !matched_keys.contains(k));
    let orphaned_annotations = annotations.len();

    let mut counts = PriorityCounts::default();
    let total_vacancies = rows.len();

    let mut groups: Vec<DashboardGroup> = group_by_company(rows, |r| r.company_name.as_str())
        .into_iter()
        .map(|group| {
            let mut vacancies = group.items;
            vacancies.sort_by(|a, b| {
                a.display_priority
                    .cmp(&b.display_priority)
                    .then_with(|| a.title.cmp(&b.title))
            });

            let mut group_counts = PriorityCounts::default();
            for v in &vacancies {
                group_counts.add(v.display_priority);
                counts.add(v.display_priority);
            }

            DashboardGroup {
                company_name: group.name,
                top_priority: vacancies
                    .iter()
                    .map(|v| v.display_priority)
                    .min()
                    .unwrap_or(Priority::Green),
                counts: group_counts,
                vacancies,
            }
        })
        .collect();

    groups.sort_by(|a, b| {
        a.top_priority.cmp(&b.top_priority).then_with(|| {
            a.company_name
                .to_lowercase()
                .cmp(&b.company_name.to_lowercase())
        })
    });

    Dashboard {
        groups,
        total_vacancies,
        counts,
        orphaned_annotations,
    }
}
