use std::sync::Arc;

use crate::ats::VacancySource;
use crate::config::Config;
use crate::priority::store::AnnotationStore;
use crate::rate_limit::RateLimiter;
use crate::silver_medalists::matcher::CandidateMatcher;
use crate::vacancies::store::VisibilityStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once in `main`; every client and store is explicit here.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// ATS records behind the TTL cache.
    pub source: Arc<dyn VacancySource>,
    pub annotations: Arc<dyn AnnotationStore>,
    pub visibility: Arc<dyn VisibilityStore>,
    /// Default: LlmCandidateMatcher.
    pub matcher: Arc<dyn CandidateMatcher>,
    /// Guards the LLM matching endpoint.
    pub limiter: Arc<RateLimiter>,
}
