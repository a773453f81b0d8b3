//! Axum route handlers for priority annotations.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::auth::StaffUser;
use crate::errors::AppError;
use crate::models::annotation::{AnnotationKey, AnnotationWrite, PriorityAnnotation};
use crate::priority::calculator::{
    AccountHealth, ClientPainLevel, Priority, PriorityInputs, Signal, StrategicValue,
    TimeCriticality,
};
use crate::state::AppState;

const MAX_NOTES_LEN: usize = 5000;

/// Request body for `PUT /api/v1/priorities/:job_id/:company_id`.
/// Missing or null fields unset the value; empty strings count as unset too.
#[derive(Debug, Default, Deserialize)]
pub struct AnnotationRequest {
    pub client_pain_level: Option<String>,
    pub time_criticality: Option<String>,
    pub strategic_value: Option<String>,
    pub account_health: Option<String>,
    pub manual_override: Option<String>,
    pub notes: Option<String>,
}

impl AnnotationRequest {
    /// Strict validation: unknown labels are rejected rather than silently dropped.
    pub fn validate(self) -> Result<AnnotationWrite, AppError> {
        let notes = self.notes.unwrap_or_default().trim().to_string();
        if notes.chars().count() > MAX_NOTES_LEN {
            return Err(AppError::Validation(format!(
                "notes cannot exceed {MAX_NOTES_LEN} characters"
            )));
        }

        Ok(AnnotationWrite {
            inputs: PriorityInputs {
                client_pain_level: parse_signal::<ClientPainLevel>(
                    "client_pain_level",
                    self.client_pain_level,
                )?,
                time_criticality: parse_signal::<TimeCriticality>(
                    "time_criticality",
                    self.time_criticality,
                )?,
                strategic_value: parse_signal::<StrategicValue>(
                    "strategic_value",
                    self.strategic_value,
                )?,
                account_health: parse_signal::<AccountHealth>(
                    "account_health",
                    self.account_health,
                )?,
            },
            manual_override: parse_override(self.manual_override)?,
            notes,
        })
    }
}

fn parse_signal<T: Signal>(field: &str, raw: Option<String>) -> Result<Option<T>, AppError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(label) => T::parse(label).map(Some).ok_or_else(|| {
            let allowed: Vec<&str> = T::RANKED.iter().map(|v| v.label()).collect();
            AppError::Validation(format!(
                "{field} must be one of {allowed:?}, got '{label}'"
            ))
        }),
    }
}

fn parse_override(raw: Option<String>) -> Result<Option<Priority>, AppError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(label) => Priority::parse(label).map(Some).ok_or_else(|| {
            AppError::Validation(format!(
                "manual_override must be one of Red, Orange, Green, got '{label}'"
            ))
        }),
    }
}

/// GET /api/v1/priorities
pub async fn handle_list_priorities(
    State(state): State<AppState>,
    _staff: StaffUser,
) -> Result<Json<Vec<PriorityAnnotation>>, AppError> {
    Ok(Json(state.annotations.list_all().await?))
}

/// GET /api/v1/priorities/:job_id/:company_id
pub async fn handle_get_priority(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path((job_id, company_id)): Path<(i64, i64)>,
) -> Result<Json<PriorityAnnotation>, AppError> {
    let key = AnnotationKey { job_id, company_id };
    state
        .annotations
        .get(key)
        .await?
        .map(Json)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "No priority for job {job_id} at company {company_id}"
            ))
        })
}

/// PUT /api/v1/priorities/:job_id/:company_id
///
/// Admin only. Creates the annotation on first write; `calculated_priority`
/// is derived server-side and cannot be set by the client.
pub async fn handle_put_priority(
    State(state): State<AppState>,
    staff: StaffUser,
    Path((job_id, company_id)): Path<(i64, i64)>,
    Json(request): Json<AnnotationRequest>,
) -> Result<Json<PriorityAnnotation>, AppError> {
    staff.require_admin()?;
    let write = request.validate()?;

    let key = AnnotationKey { job_id, company_id };
    let annotation = state.annotations.upsert(key, write, &staff.email).await?;
    Ok(Json(annotation))
}
