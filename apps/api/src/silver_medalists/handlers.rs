//! Axum route handlers for silver-medalist resurfacing.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;

use crate::ats::models::{Candidate, Vacancy};
use crate::auth::StaffUser;
use crate::errors::AppError;
use crate::routes::RefreshQuery;
use crate::silver_medalists::detection::{find_silver_medalists, SilverMedalist};
use crate::silver_medalists::matcher::{match_silver_medalists, MatchOutcome};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SilverMedalistsResponse {
    pub job_id: i64,
    pub vacancy_title: String,
    pub candidates: Vec<SilverMedalist>,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub job_id: i64,
    pub vacancy_title: String,
    pub pool_size: usize,
    #[serde(flatten)]
    pub outcome: MatchOutcome,
}

async fn load_pool(
    state: &AppState,
    job_id: i64,
    refresh: bool,
) -> Result<(Vacancy, Vec<SilverMedalist>), AppError> {
    let vacancies = state.source.vacancies(refresh).await?;
    let vacancy = vacancies
        .iter()
        .find(|v| v.job_id == job_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Vacancy {job_id} not found")))?;

    let candidates: Vec<Candidate> = state.source.candidates(refresh).await?;
    let pool = find_silver_medalists(&candidates, &vacancies, job_id);
    Ok((vacancy, pool))
}

/// GET /api/v1/silver-medalists/:job_id
pub async fn handle_list_silver_medalists(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path(job_id): Path<i64>,
    Query(params): Query<RefreshQuery>,
) -> Result<Json<SilverMedalistsResponse>, AppError> {
    let (vacancy, pool) = load_pool(&state, job_id, params.refresh).await?;
    Ok(Json(SilverMedalistsResponse {
        job_id,
        vacancy_title: vacancy.title,
        candidates: pool,
    }))
}

/// POST /api/v1/silver-medalists/:job_id/match
///
/// Rate limited per staff member: every call may hit the LLM.
pub async fn handle_match_silver_medalists(
    State(state): State<AppState>,
    staff: StaffUser,
    Path(job_id): Path<i64>,
    Query(params): Query<RefreshQuery>,
) -> Result<Json<MatchResponse>, AppError> {
    state.limiter.check(&staff.email)?;

    let (vacancy, pool) = load_pool(&state, job_id, params.refresh).await?;
    let outcome = match_silver_medalists(state.matcher.as_ref(), &vacancy, &pool).await?;

    Ok(Json(MatchResponse {
        job_id,
        vacancy_title: vacancy.title,
        pool_size: pool.len(),
        outcome,
    }))
}
