use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::analytics::metrics::{
    compute_overview, compute_vacancy_metrics, AnalyticsOverview, VacancyMetrics,
};
use crate::auth::StaffUser;
use crate::errors::AppError;
use crate::routes::RefreshQuery;
use crate::state::AppState;

/// GET /api/v1/analytics
pub async fn handle_overview(
    State(state): State<AppState>,
    _staff: StaffUser,
    Query(params): Query<RefreshQuery>,
) -> Result<Json<AnalyticsOverview>, AppError> {
    let vacancies = state.source.vacancies(params.refresh).await?;
    let candidates = state.source.candidates(params.refresh).await?;
    Ok(Json(compute_overview(&vacancies, &candidates)))
}

/// GET /api/v1/analytics/vacancies/:job_id
pub async fn handle_vacancy_metrics(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path(job_id): Path<i64>,
    Query(params): Query<RefreshQuery>,
) -> Result<Json<VacancyMetrics>, AppError> {
    let vacancies = state.source.vacancies(params.refresh).await?;
    let vacancy = vacancies
        .iter()
        .find(|v| v.job_id == job_id)
        .ok_or_else(|| AppError::NotFound(format!("Vacancy {job_id} not found")))?;

    let candidates = state.source.candidates(params.refresh).await?;
    Ok(Json(compute_vacancy_metrics(vacancy, &candidates)))
}
