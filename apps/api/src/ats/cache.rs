//! TTL cache for parsed ATS records, stored as a timestamped row per payload.
//!
//! A cache failure never fails a request: reads fall through to the upstream
//! source and writes are logged and dropped.

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use tracing::{debug, info, warn};

use crate::ats::models::{Candidate, Vacancy};
use crate::ats::{AtsError, VacancySource};
use crate::config::MAX_ATS_CACHE_TTL_SECS;

const VACANCIES_KEY: &str = "vacancies";
const CANDIDATES_KEY: &str = "candidates";

#[derive(Debug, Clone, FromRow)]
pub struct CacheEntry {
    pub payload: Value,
    pub fetched_at: DateTime<Utc>,
}

#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<CacheEntry>>;

    async fn store(&self, key: &str, payload: &Value, fetched_at: DateTime<Utc>) -> Result<()>;
}

pub struct PgCacheStore {
    pool: PgPool,
}

impl PgCacheStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CacheStore for PgCacheStore {
    async fn load(&self, key: &str) -> Result<Option<CacheEntry>> {
        let entry = sqlx::query_as::<_, CacheEntry>(
            "SELECT payload, fetched_at FROM ats_cache WHERE cache_key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn store(&self, key: &str, payload: &Value, fetched_at: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO ats_cache (cache_key, payload, fetched_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (cache_key) DO UPDATE
                SET payload = EXCLUDED.payload, fetched_at = EXCLUDED.fetched_at
            "#,
        )
        .bind(key)
        .bind(payload)
        .bind(fetched_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

pub fn is_fresh(fetched_at: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    now.signed_duration_since(fetched_at) < ttl
}

/// Wraps a `VacancySource` with a read-through TTL cache.
pub struct CachedSource<S> {
    inner: S,
    cache: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl<S: VacancySource> CachedSource<S> {
    /// `ttl_secs` is capped at `MAX_ATS_CACHE_TTL_SECS`.
    pub fn new(inner: S, cache: Arc<dyn CacheStore>, ttl_secs: u64) -> Self {
        Self {
            inner,
            cache,
            ttl: Duration::seconds(ttl_secs.min(MAX_ATS_CACHE_TTL_SECS) as i64),
        }
    }

    async fn read_through<T, F, Fut>(&self, key: &str, refresh: bool, fetch: F) -> Result<Vec<T>, AtsError>
    where
        T: Serialize + DeserializeOwned + Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<Vec<T>, AtsError>> + Send,
    {
        if !refresh {
            match self.cache.load(key).await {
                Ok(Some(entry)) if is_fresh(entry.fetched_at, Utc::now(), self.ttl) => {
                    match serde_json::from_value::<Vec<T>>(entry.payload) {
                        Ok(items) => {
                            debug!("ATS cache hit for '{key}' ({} records)", items.len());
                            return Ok(items);
                        }
                        Err(e) => warn!("Discarding unreadable ATS cache entry '{key}': {e}"),
                    }
                }
                Ok(_) => debug!("ATS cache miss for '{key}'"),
                Err(e) => warn!("ATS cache read failed for '{key}': {e}"),
            }
        }

        let items = fetch().await?;
        info!("Fetched {} '{key}' records from ATS", items.len());

        match serde_json::to_value(&items) {
            Ok(payload) => {
                if let Err(e) = self.cache.store(key, &payload, Utc::now()).await {
                    warn!("ATS cache write failed for '{key}': {e}");
                }
            }
            Err(e) => warn!("Could not serialize '{key}' for the ATS cache: {e}"),
        }

        Ok(items)
    }
}

#[async_trait]
impl<S: VacancySource> VacancySource for CachedSource<S> {
    async fn vacancies(&self, refresh: bool) -> Result<Vec<Vacancy>, AtsError> {
        self.read_through(VACANCIES_KEY, refresh, || self.inner.vacancies(true))
            .await
    }

    async fn candidates(&self, refresh: bool) -> Result<Vec<Candidate>, AtsError> {
        self.read_through(CANDIDATES_KEY, refresh, || self.inner.candidates(true))
            .await
    }
}

#[cfg(test)]
pub mod memory {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct InMemoryCacheStore {
        pub entries: Mutex<HashMap<String, CacheEntry>>,
    }

    #[async_trait]
    impl CacheStore for InMemoryCacheStore {
        async fn load(&self, key: &str) -> Result<Option<CacheEntry>> {
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        async fn store(&self, key: &str, payload: &Value, fetched_at: DateTime<Utc>) -> Result<()> {
            self.entries.lock().unwrap().insert(
                key.to_string(),
                CacheEntry {
                    payload: payload.clone(),
                    fetched_at,
                },
            );
            Ok(())
        }
    }
}
