//! Upsert-by-key and read-all over `priority_annotations`.
//!
//! `AppState` holds an `Arc<dyn AnnotationStore>`; production uses
//! `PgAnnotationStore`. The calculated tier is always derived inside `upsert`,
//! so a stored row can never disagree with its four inputs.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::annotation::{
    AnnotationKey, AnnotationWrite, PriorityAnnotation, PriorityAnnotationRow,
};
use crate::priority::calculator::{calculate_priority, Signal};

#[async_trait]
pub trait AnnotationStore: Send + Sync {
    /// Creates the annotation on first write, replaces its fields afterwards.
    async fn upsert(
        &self,
        key: AnnotationKey,
        write: AnnotationWrite,
        updated_by: &str,
    ) -> Result<PriorityAnnotation, AppError>;

    async fn get(&self, key: AnnotationKey) -> Result<Option<PriorityAnnotation>, AppError>;

    /// Every annotation, including ones whose vacancy vanished upstream.
    async fn list_all(&self) -> Result<Vec<PriorityAnnotation>, AppError>;
}

pub struct PgAnnotationStore {
    pool: PgPool,
}

impl PgAnnotationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnnotationStore for PgAnnotationStore {
    async fn upsert(
        &self,
        key: AnnotationKey,
        write: AnnotationWrite,
        updated_by: &str,
    ) -> Result<PriorityAnnotation, AppError> {
        let calculated = calculate_priority(&write.inputs);
        let inputs = write.inputs;

        let row: PriorityAnnotationRow = sqlx::query_as(
            r#"
            INSERT INTO priority_annotations
                (id, job_id, company_id, client_pain_level, time_criticality,
                 strategic_value, account_health, manual_override, notes,
                 calculated_priority, updated_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (job_id, company_id) DO UPDATE SET
                client_pain_level   = EXCLUDED.client_pain_level,
                time_criticality    = EXCLUDED.time_criticality,
                strategic_value     = EXCLUDED.strategic_value,
                account_health      = EXCLUDED.account_health,
                manual_override     = EXCLUDED.manual_override,
                notes               = EXCLUDED.notes,
                calculated_priority = EXCLUDED.calculated_priority,
                updated_by          = EXCLUDED.updated_by,
                updated_at          = now()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(key.job_id)
        .bind(key.company_id)
        .bind(inputs.client_pain_level.map(Signal::label))
        .bind(inputs.time_criticality.map(Signal::label))
        .bind(inputs.strategic_value.map(Signal::label))
        .bind(inputs.account_health.map(Signal::label))
        .bind(write.manual_override.map(|p| p.label()))
        .bind(&write.notes)
        .bind(calculated.label())
        .bind(updated_by)
        .fetch_one(&self.pool)
        .await?;

        info!(
            "Upserted priority for job {} / company {}: {} by {}",
            key.job_id, key.company_id, calculated, updated_by
        );

        Ok(row.into())
    }

    async fn get(&self, key: AnnotationKey) -> Result<Option<PriorityAnnotation>, AppError> {
        let row: Option<PriorityAnnotationRow> = sqlx::query_as(
            "SELECT * FROM priority_annotations WHERE job_id = $1 AND company_id = $2",
        )
        .bind(key.job_id)
        .bind(key.company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_all(&self) -> Result<Vec<PriorityAnnotation>, AppError> {
        let rows: Vec<PriorityAnnotationRow> =
            sqlx::query_as("SELECT * FROM priority_annotations ORDER BY job_id, company_id")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// In-memory store for handler and service tests.
#[cfg(test)]
pub mod memory {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct InMemoryAnnotationStore {
        rows: Mutex<HashMap<AnnotationKey, PriorityAnnotation>>,
    }

    #[async_trait]
    impl AnnotationStore for InMemoryAnnotationStore {
        async fn upsert(
            &self,
            key: AnnotationKey,
            write: AnnotationWrite,
            updated_by: &str,
        ) -> Result<PriorityAnnotation, AppError> {
            let mut rows = self.rows.lock().unwrap();
            let existing = rows.get(&key).map(|a| (a.id, a.created_at));
            let id = existing.map(|(id, _)| id).unwrap_or_else(Uuid::new_v4);
            let mut annotation =
                PriorityAnnotation::from_write(id, key, write, updated_by, Utc::now());
            if let Some((_, created_at)) = existing {
                annotation.created_at = created_at;
            }
            rows.insert(key, annotation.clone());
            Ok(annotation)
        }

        async fn get(&self, key: AnnotationKey) -> Result<Option<PriorityAnnotation>, AppError> {
            Ok(self.rows.lock().unwrap().get(&key).cloned())
        }

        async fn list_all(&self) -> Result<Vec<PriorityAnnotation>, AppError> {
            let mut all: Vec<_> = self.rows.lock().unwrap().values().cloned().collect();
            all.sort_by_key(|a| (a.job_id, a.company_id));
            Ok(all)
        }
    }
}
