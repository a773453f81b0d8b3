//! Axum route handlers for the vacancy dashboard.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::ats::models::Vacancy;
use crate::auth::StaffUser;
use crate::errors::AppError;
use crate::models::visibility::{VacancyVisibility, VisibilityWrite};
use crate::routes::RefreshQuery;
use crate::state::AppState;
use crate::vacancies::dashboard::{build_dashboard, Dashboard};

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub include_hidden: bool,
    #[serde(default)]
    pub refresh: bool,
}

/// GET /api/v1/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    _staff: StaffUser,
    Query(params): Query<DashboardQuery>,
) -> Result<Json<Dashboard>, AppError> {
    let vacancies = state.source.vacancies(params.refresh).await?;
    let annotations = state.annotations.list_all().await?;
    let visibility = state.visibility.list_all().await?;

    Ok(Json(build_dashboard(
        &vacancies,
        annotations,
        &visibility,
        params.include_hidden,
    )))
}

/// GET /api/v1/vacancies
pub async fn handle_list_vacancies(
    State(state): State<AppState>,
    _staff: StaffUser,
    Query(params): Query<RefreshQuery>,
) -> Result<Json<Vec<Vacancy>>, AppError> {
    Ok(Json(state.source.vacancies(params.refresh).await?))
}

/// PUT /api/v1/vacancies/:job_id/visibility
///
/// Admin only. Hides a vacancy from the dashboard and/or assigns it to a
/// client company when the ATS company is wrong or missing.
pub async fn handle_put_visibility(
    State(state): State<AppState>,
    staff: StaffUser,
    Path(job_id): Path<i64>,
    Json(mut request): Json<VisibilityWrite>,
) -> Result<Json<VacancyVisibility>, AppError> {
    staff.require_admin()?;

    if let Some(name) = request.assigned_company_name.take() {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(
                "assigned_company_name cannot be blank; omit it to clear the assignment".to_string(),
            ));
        }
        request.assigned_company_name = Some(name.to_string());
    }

    let row = state
        .visibility
        .upsert(job_id, request, &staff.email)
        .await?;
    Ok(Json(row))
}
