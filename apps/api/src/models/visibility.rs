use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Dashboard visibility and client-company assignment of one vacancy.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VacancyVisibility {
    pub job_id: i64,
    pub hidden: bool,
    pub assigned_company_id: Option<i64>,
    pub assigned_company_name: Option<String>,
    pub updated_by: String,
    pub updated_at: DateTime<Utc>,
}

/// Request body for `PUT /api/v1/vacancies/:job_id/visibility`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VisibilityWrite {
    #[serde(default)]
    pub hidden: bool,
    pub assigned_company_id: Option<i64>,
    pub assigned_company_name: Option<String>,
}
