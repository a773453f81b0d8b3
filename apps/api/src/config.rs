use anyhow::{ensure, Context, Result};

/// Longest accepted `ATS_CACHE_TTL_SECS`: one week.
pub const MAX_ATS_CACHE_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub ats_base_url: String,
    pub ats_api_token: String,
    pub anthropic_api_key: String,
    /// Lower-cased staff emails allowed to edit priorities and visibility.
    pub admin_emails: Vec<String>,
    pub ats_cache_ttl_secs: u64,
    pub match_rate_limit_per_minute: u32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            ats_base_url: require_env("ATS_BASE_URL")?,
            ats_api_token: require_env("ATS_API_TOKEN")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            admin_emails: parse_admin_emails(&std::env::var("ADMIN_EMAILS").unwrap_or_default()),
            ats_cache_ttl_secs: check_cache_ttl(optional_env("ATS_CACHE_TTL_SECS", 900)?)?,
            match_rate_limit_per_minute: optional_env("MATCH_RATE_LIMIT_PER_MINUTE", 10)?,
            port: optional_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn is_admin(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.admin_emails.iter().any(|a| *a == email)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number")),
        Err(_) => Ok(default),
    }
}

fn check_cache_ttl(secs: u64) -> Result<u64> {
    ensure!(
        secs <= MAX_ATS_CACHE_TTL_SECS,
        "ATS_CACHE_TTL_SECS must be at most {MAX_ATS_CACHE_TTL_SECS}, got {secs}"
    );
    Ok(secs)
}

fn parse_admin_emails(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

#[cfg(test)]
impl Config {
    /// Config for unit tests; never read from the environment.
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/recruit_test".to_string(),
            ats_base_url: "http://ats.invalid".to_string(),
            ats_api_token: "test-token".to_string(),
            anthropic_api_key: "test-key".to_string(),
            admin_emails: vec!["admin@example.com".to_string()],
            ats_cache_ttl_secs: 900,
            match_rate_limit_per_minute: 2,
            port: 8080,
            rust_log: "debug".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_admin_emails_trims_and_lowercases() {
        let emails = parse_admin_emails(" Anna@Example.com, ,bob@example.com ");
        assert_eq!(emails, vec!["anna@example.com", "bob@example.com"]);
    }

    #[test]
    fn test_parse_admin_emails_empty() {
        assert!(parse_admin_emails("").is_empty());
    }

    #[test]
    fn test_cache_ttl_is_bounded() {
        assert_eq!(check_cache_ttl(0).unwrap(), 0);
        assert_eq!(
            check_cache_ttl(MAX_ATS_CACHE_TTL_SECS).unwrap(),
            MAX_ATS_CACHE_TTL_SECS
        );
        assert!(check_cache_ttl(MAX_ATS_CACHE_TTL_SECS + 1).is_err());
        assert!(check_cache_ttl(u64::MAX).is_err());
    }

    #[test]
    fn test_is_admin_case_insensitive() {
        let config = Config::for_tests();
        assert!(config.is_admin("ADMIN@example.com"));
        assert!(!config.is_admin("staff@example.com"));
    }
}
