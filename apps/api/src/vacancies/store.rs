use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::models::visibility::{VacancyVisibility, VisibilityWrite};

#[async_trait]
pub trait VisibilityStore: Send + Sync {
    async fn upsert(
        &self,
        job_id: i64,
        write: VisibilityWrite,
        updated_by: &str,
    ) -> Result<VacancyVisibility, AppError>;

    async fn list_all(&self) -> Result<Vec<VacancyVisibility>, AppError>;
}

pub struct PgVisibilityStore {
    pool: PgPool,
}

impl PgVisibilityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VisibilityStore for PgVisibilityStore {
    async fn upsert(
        &self,
        job_id: i64,
        write: VisibilityWrite,
        updated_by: &str,
    ) -> Result<VacancyVisibility, AppError> {
        let row: VacancyVisibility = sqlx::query_as(
            r#"
            INSERT INTO vacancy_visibility
                (job_id, hidden, assigned_company_id, assigned_company_name, updated_by, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (job_id) DO UPDATE SET
                hidden                = EXCLUDED.hidden,
                assigned_company_id   = EXCLUDED.assigned_company_id,
                assigned_company_name = EXCLUDED.assigned_company_name,
                updated_by            = EXCLUDED.updated_by,
                updated_at            = EXCLUDED.updated_at
            RETURNING *
            "#,
        )
        .bind(job_id)
        .bind(write.hidden)
        .bind(write.assigned_company_id)
        .bind(&write.assigned_company_name)
        .bind(updated_by)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        info!(
            "Vacancy {job_id} visibility set by {updated_by}: hidden={}, assigned={:?}",
            row.hidden, row.assigned_company_name
        );
        Ok(row)
    }

    async fn list_all(&self) -> Result<Vec<VacancyVisibility>, AppError> {
        let rows = sqlx::query_as::<_, VacancyVisibility>(
            "SELECT * FROM vacancy_visibility ORDER BY job_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
