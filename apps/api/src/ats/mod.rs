//! ATS boundary — the only code that knows the shape of the applicant tracking
//! system's JSON. Everything past `parse` works on strict records.

pub mod cache;
pub mod client;
pub mod models;
pub mod parse;

use async_trait::async_trait;
use thiserror::Error;

use crate::ats::models::{Candidate, Vacancy};

#[derive(Debug, Error)]
pub enum AtsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Supplier of vacancy and candidate records. `refresh` bypasses any cache.
#[async_trait]
pub trait VacancySource: Send + Sync {
    async fn vacancies(&self, refresh: bool) -> Result<Vec<Vacancy>, AtsError>;

    async fn candidates(&self, refresh: bool) -> Result<Vec<Candidate>, AtsError>;
}

/// Fixed records for handler tests.
#[cfg(test)]
pub mod fixture {
    use super::*;

    #[derive(Default)]
    pub struct StaticSource {
        pub vacancies: Vec<Vacancy>,
        pub candidates: Vec<Candidate>,
    }

    #[async_trait]
    impl VacancySource for StaticSource {
        async fn vacancies(&self, _refresh: bool) -> Result<Vec<Vacancy>, AtsError> {
            Ok(self.vacancies.clone())
        }

        async fn candidates(&self, _refresh: bool) -> Result<Vec<Candidate>, AtsError> {
            Ok(self.candidates.clone())
        }
    }
}
