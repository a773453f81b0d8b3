//! Candidate matching — pluggable, trait-based scorer for silver medalists.
//!
//! `LlmCandidateMatcher` asks the model which pool members fit a vacancy;
//! `resolve_matches` turns its raw answer into a validated outcome.
//!
//! When the model returns no usable match the outcome is `MatchMode::Unfiltered`:
//! the whole pool at `FALLBACK_SCORE`. The mode is part of the response and the
//! fallback is logged, so callers never mistake it for a real match.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::ats::models::Vacancy;
use crate::errors::AppError;
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, NO_INVENTION_INSTRUCTION};
use crate::llm_client::LlmClient;
use crate::silver_medalists::detection::SilverMedalist;
use crate::silver_medalists::prompts::{MATCH_PROMPT_TEMPLATE, MATCH_SYSTEM};

pub const FALLBACK_SCORE: u8 = 50;

/// One match as the model returned it, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMatch {
    pub candidate_id: i64,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawMatchResponse {
    #[serde(default)]
    matches: Vec<RawMatch>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Candidates were selected and scored by the model.
    Matched,
    /// The model selected nobody; the whole pool is returned unscored.
    Unfiltered,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateMatch {
    #[serde(flatten)]
    pub candidate: SilverMedalist,
    pub score: u8,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchOutcome {
    pub mode: MatchMode,
    pub matches: Vec<CandidateMatch>,
}

#[async_trait]
pub trait CandidateMatcher: Send + Sync {
    async fn match_candidates(
        &self,
        vacancy: &Vacancy,
        pool: &[SilverMedalist],
    ) -> Result<Vec<RawMatch>, AppError>;
}

pub struct LlmCandidateMatcher(pub LlmClient);

#[async_trait]
impl CandidateMatcher for LlmCandidateMatcher {
    async fn match_candidates(
        &self,
        vacancy: &Vacancy,
        pool: &[SilverMedalist],
    ) -> Result<Vec<RawMatch>, AppError> {
        let prompt = build_match_prompt(vacancy, pool)?;
        let system = format!("{MATCH_SYSTEM} {JSON_ONLY_SYSTEM} {NO_INVENTION_INSTRUCTION}");

        let response: RawMatchResponse = self
            .0
            .call_json(&prompt, &system)
            .await
            .map_err(|e| AppError::Llm(format!("Candidate matching failed: {e}")))?;

        Ok(response.matches)
    }
}

fn build_match_prompt(vacancy: &Vacancy, pool: &[SilverMedalist]) -> Result<String, AppError> {
    let candidates: Vec<_> = pool
        .iter()
        .map(|m| {
            json!({
                "candidate_id": m.candidate_id,
                "name": m.name,
                "earlier_vacancy": m.past_job_title,
                "furthest_stage": m.furthest_stage,
                "stage_name": m.stage_name,
            })
        })
        .collect();

    let candidates_json = serde_json::to_string_pretty(&candidates)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize pool: {e}")))?;

    let company = vacancy
        .company
        .as_ref()
        .map(|c| c.name.as_str())
        .unwrap_or("unknown");

    Ok(MATCH_PROMPT_TEMPLATE
        .replace("{vacancy_title}", &vacancy.title)
        .replace("{company}", company)
        .replace("{candidates_json}", &candidates_json))
}

/// Validates raw model output against the pool.
///
/// Ids outside the pool are dropped, duplicates keep their first occurrence,
/// scores are clamped to 0–100 and results sorted by score (desc).
pub fn resolve_matches(raw: Vec<RawMatch>, pool: &[SilverMedalist]) -> MatchOutcome {
    let mut seen = HashSet::new();
    let mut matches: Vec<CandidateMatch> = raw
        .into_iter()
        .filter(|m| seen.insert(m.candidate_id))
        .filter_map(|m| {
            let candidate = pool.iter().find(|c| c.candidate_id == m.candidate_id)?;
            Some(CandidateMatch {
                candidate: candidate.clone(),
                score: clamp_score(m.score),
                reason: m.reason,
            })
        })
        .collect();

    if matches.is_empty() && !pool.is_empty() {
        warn!(
            "Model selected no candidates from a pool of {}; returning the unfiltered pool at score {}",
            pool.len(),
            FALLBACK_SCORE
        );
        return MatchOutcome {
            mode: MatchMode::Unfiltered,
            matches: pool
                .iter()
                .map(|c| CandidateMatch {
                    candidate: c.clone(),
                    score: FALLBACK_SCORE,
                    reason: None,
                })
                .collect(),
        };
    }

    matches.sort_by(|a, b| b.score.cmp(&a.score));
    MatchOutcome {
        mode: MatchMode::Matched,
        matches,
    }
}

fn clamp_score(score: f64) -> u8 {
    if score.is_nan() {
        return 0;
    }
    score.round().clamp(0.0, 100.0) as u8
}

/// Matches the pool against a vacancy. An empty pool never reaches the model.
pub async fn match_silver_medalists(
    matcher: &dyn CandidateMatcher,
    vacancy: &Vacancy,
    pool: &[SilverMedalist],
) -> Result<MatchOutcome, AppError> {
    if pool.is_empty() {
        return Ok(MatchOutcome {
            mode: MatchMode::Matched,
            matches: vec![],
        });
    }

    let raw = matcher.match_candidates(vacancy, pool).await?;
    let outcome = resolve_matches(raw, pool);
    info!(
        "Matched {} of {} silver medalists for vacancy {} ({:?})",
        outcome.matches.len(),
        pool.len(),
        vacancy.job_id,
        outcome.mode
    );
    Ok(outcome)
}
