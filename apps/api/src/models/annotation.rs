use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::priority::calculator::{calculate_priority, Priority, PriorityInputs};
use crate::priority::display::resolve_display_priority;

/// Identity of an annotation: one per vacancy and client company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnnotationKey {
    pub job_id: i64,
    pub company_id: i64,
}

/// Raw `priority_annotations` row. Labels are stored as free text.
#[derive(Debug, Clone, FromRow)]
pub struct PriorityAnnotationRow {
    pub id: Uuid,
    pub job_id: i64,
    pub company_id: i64,
    pub client_pain_level: Option<String>,
    pub time_criticality: Option<String>,
    pub strategic_value: Option<String>,
    pub account_health: Option<String>,
    pub manual_override: Option<String>,
    pub notes: String,
    pub calculated_priority: String,
    pub updated_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated values for an annotation write. `calculated_priority` is not
/// part of it: the store derives it from `inputs`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationWrite {
    pub inputs: PriorityInputs,
    pub manual_override: Option<Priority>,
    pub notes: String,
}

/// A priority annotation as served to the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct PriorityAnnotation {
    pub id: Uuid,
    pub job_id: i64,
    pub company_id: i64,
    #[serde(flatten)]
    pub inputs: PriorityInputs,
    pub manual_override: Option<Priority>,
    pub notes: String,
    pub calculated_priority: Priority,
    pub display_priority: Priority,
    pub updated_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PriorityAnnotation {
    pub fn key(&self) -> AnnotationKey {
        AnnotationKey {
            job_id: self.job_id,
            company_id: self.company_id,
        }
    }

    /// Builds a fresh annotation from a write, deriving both tiers.
    pub fn from_write(
        id: Uuid,
        key: AnnotationKey,
        write: AnnotationWrite,
        updated_by: &str,
        now: DateTime<Utc>,
    ) -> Self {
        let calculated_priority = calculate_priority(&write.inputs);
        Self {
            id,
            job_id: key.job_id,
            company_id: key.company_id,
            inputs: write.inputs,
            manual_override: write.manual_override,
            notes: write.notes,
            calculated_priority,
            display_priority: resolve_display_priority(calculated_priority, write.manual_override),
            updated_by: updated_by.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<PriorityAnnotationRow> for PriorityAnnotation {
    fn from(row: PriorityAnnotationRow) -> Self {
        let inputs = PriorityInputs::from_labels(
            row.client_pain_level.as_deref(),
            row.time_criticality.as_deref(),
            row.strategic_value.as_deref(),
            row.account_health.as_deref(),
        );
        let manual_override = row.manual_override.as_deref().and_then(Priority::parse);
        let calculated_priority = Priority::parse(&row.calculated_priority)
            .unwrap_or_else(|| calculate_priority(&inputs));

        Self {
            id: row.id,
            job_id: row.job_id,
            company_id: row.company_id,
            inputs,
            manual_override,
            notes: row.notes,
            calculated_priority,
            display_priority: resolve_display_priority(calculated_priority, manual_override),
            updated_by: row.updated_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
