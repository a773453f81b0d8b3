use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub company_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VacancyStatus {
    Published,
    Draft,
    Closed,
    Archived,
    #[default]
    Unknown,
}

/// A vacancy as reported by the ATS. Read-only; lives as long as upstream lists it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vacancy {
    pub job_id: i64,
    pub company_id: i64,
    pub title: String,
    pub company: Option<Company>,
    pub status: VacancyStatus,
    pub created_at: Option<DateTime<Utc>>,
}

/// Pipeline stage buckets, ordered by how far a candidate got.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageCategory {
    Applied,
    Screening,
    Interview,
    Offer,
    Hired,
}

/// One candidate's application to one vacancy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub job_id: i64,
    pub stage_name: Option<String>,
    pub stage: StageCategory,
    pub created_at: Option<DateTime<Utc>>,
    pub hired_at: Option<DateTime<Utc>>,
    pub disqualified: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub placements: Vec<Placement>,
}

impl Candidate {
    pub fn was_hired(&self) -> bool {
        self.placements.iter().any(|p| p.stage == StageCategory::Hired)
    }
}
