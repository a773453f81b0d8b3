use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::ats::models::{Candidate, Vacancy};
use crate::ats::parse::{parse_candidates, parse_vacancies};
use crate::ats::{AtsError, VacancySource};

/// HTTP client for the ATS API. One attempt per call; failures surface to the caller.
#[derive(Clone)]
pub struct AtsClient {
    client: Client,
    base_url: String,
    api_token: String,
}

impl AtsClient {
    pub fn new(base_url: String, api_token: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        }
    }

    async fn get_json(&self, path: &str) -> Result<Value, AtsError> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .header("accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AtsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let value: Value = serde_json::from_str(&body)?;
        debug!("ATS GET {path} returned {} bytes", body.len());
        Ok(value)
    }
}

#[async_trait]
impl VacancySource for AtsClient {
    async fn vacancies(&self, _refresh: bool) -> Result<Vec<Vacancy>, AtsError> {
        Ok(parse_vacancies(&self.get_json("offers").await?))
    }

    async fn candidates(&self, _refresh: bool) -> Result<Vec<Candidate>, AtsError> {
        Ok(parse_candidates(&self.get_json("candidates").await?))
    }
}
