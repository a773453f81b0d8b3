mod analytics;
mod ats;
mod auth;
mod companies;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod priority;
mod rate_limit;
mod routes;
mod silver_medalists;
mod state;
mod vacancies;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ats::cache::{CachedSource, PgCacheStore};
use crate::ats::client::AtsClient;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::priority::store::PgAnnotationStore;
use crate::rate_limit::RateLimiter;
use crate::routes::build_router;
use crate::silver_medalists::matcher::LlmCandidateMatcher;
use crate::state::AppState;
use crate::vacancies::store::PgVisibilityStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration first: fails fast on missing required env vars
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting recruitment dashboard API v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url).await?;

    let ats = AtsClient::new(config.ats_base_url.clone(), config.ats_api_token.clone());
    let source = CachedSource::new(
        ats,
        Arc::new(PgCacheStore::new(db.clone())),
        config.ats_cache_ttl_secs,
    );
    info!(
        "ATS client initialized ({}, cache ttl {}s)",
        config.ats_base_url, config.ats_cache_ttl_secs
    );

    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let state = AppState {
        source: Arc::new(source),
        annotations: Arc::new(PgAnnotationStore::new(db.clone())),
        visibility: Arc::new(PgVisibilityStore::new(db)),
        matcher: Arc::new(LlmCandidateMatcher(llm)),
        limiter: Arc::new(RateLimiter::per_minute(config.match_rate_limit_per_minute)),
        config: config.clone(),
    };

    if state.config.admin_emails.is_empty() {
        tracing::warn!("ADMIN_EMAILS is empty: priority and visibility edits are disabled");
    }

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the dashboard host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
