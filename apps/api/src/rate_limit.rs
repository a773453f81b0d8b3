//! Per-caller fixed-window rate limiter for expensive endpoints (LLM matching).
//!
//! Constructed once in `main` and carried in `AppState`. Windows live in a Moka
//! cache whose TTL equals the window length, so idle callers are evicted without
//! a sweep.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use moka::sync::Cache;

use crate::errors::AppError;

/// Upper bound on tracked callers.
const MAX_TRACKED_KEYS: u64 = 10_000;

struct Window {
    started: Instant,
    count: u32,
}

pub struct RateLimiter {
    limit: u32,
    window: Duration,
    windows: Cache<Arc<str>, Arc<Mutex<Window>>>,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            windows: Cache::builder()
                .max_capacity(MAX_TRACKED_KEYS)
                .time_to_live(window)
                .build(),
        }
    }

    pub fn per_minute(limit: u32) -> Self {
        Self::new(limit, Duration::from_secs(60))
    }

    /// Counts one request for `key`, rejecting it once the window is full.
    pub fn check(&self, key: &str) -> Result<(), AppError> {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> Result<(), AppError> {
        let window = self.windows.get_with(Arc::from(key), || {
            Arc::new(Mutex::new(Window {
                started: now,
                count: 0,
            }))
        });
        let mut window = window.lock().unwrap_or_else(|e| e.into_inner());

        let elapsed = now.saturating_duration_since(window.started);
        if elapsed >= self.window {
            window.started = now;
            window.count = 0;
        }

        if window.count >= self.limit {
            let elapsed = now.saturating_duration_since(window.started);
            let retry_after_secs = self.window.saturating_sub(elapsed).as_secs().max(1);
            return Err(AppError::RateLimited { retry_after_secs });
        }

        window.count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_limit_then_rejects() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let now = Instant::now();
        assert!(limiter.check_at("a@example.com", now).is_ok());
        assert!(limiter.check_at("a@example.com", now).is_ok());
        assert!(matches!(
            limiter.check_at("a@example.com", now),
            Err(AppError::RateLimited { .. })
        ));
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();
        assert!(limiter.check_at("a@example.com", now).is_ok());
        assert!(limiter.check_at("b@example.com", now).is_ok());
    }

    #[test]
    fn test_retry_after_reflects_remaining_window() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();
        assert!(limiter.check_at("a@example.com", now).is_ok());
        match limiter.check_at("a@example.com", now + Duration::from_secs(45)) {
            Err(AppError::RateLimited { retry_after_secs }) => assert_eq!(retry_after_secs, 15),
            other => panic!("expected rate limit, got {other:?}"),
        }
    }

    #[test]
    fn test_window_resets() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();
        assert!(limiter.check_at("a@example.com", now).is_ok());
        assert!(limiter.check_at("a@example.com", now).is_err());
        let later = now + Duration::from_secs(61);
        assert!(limiter.check_at("a@example.com", later).is_ok());
    }
}
