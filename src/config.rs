pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/movie-passport";
pub const DEFAULT_SECRET_KEY: &str = "it's a secret";
pub const DEFAULT_OMDB_BASE_URL: &str = "http://www.omdbapi.com/";
pub const DEFAULT_OMDB_API_KEY: &str = "43cfb6f4";
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 7;
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub ttl_hours: i64,
}

#[derive(Debug, Clone)]
pub struct OmdbConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub session: SessionConfig,
    pub omdb: OmdbConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::from_lookup(|key| std::env::var(key).ok()))
    }

    /// Builds the config from any key lookup; missing or unparsable values use the dev defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());
        let session = SessionConfig {
            secret: lookup("SECRET_KEY").unwrap_or_else(|| DEFAULT_SECRET_KEY.into()),
            ttl_hours: lookup("SESSION_TTL_HOURS")
                .and_then(|v| v.parse::<i64>().ok())
                .filter(|h| *h > 0)
                .map(|h| h.min(MAX_SESSION_TTL_HOURS))
                .unwrap_or(DEFAULT_SESSION_TTL_HOURS),
        };
        let omdb = OmdbConfig {
            base_url: lookup("OMDB_BASE_URL").unwrap_or_else(|| DEFAULT_OMDB_BASE_URL.into()),
            api_key: lookup("OMDB_API_KEY").unwrap_or_else(|| DEFAULT_OMDB_API_KEY.into()),
            timeout_secs: lookup("OMDB_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(10),
        };
        Self {
            database_url,
            session,
            omdb,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn falls_back_to_dev_defaults() {
        let cfg = AppConfig::from_lookup(|_| None);
        assert_eq!(cfg.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(cfg.session.secret, DEFAULT_SECRET_KEY);
        assert_eq!(cfg.session.ttl_hours, 168);
        assert_eq!(cfg.omdb.base_url, DEFAULT_OMDB_BASE_URL);
        assert_eq!(cfg.omdb.timeout_secs, 10);
    }

    #[test]
    fn reads_overrides_and_ignores_garbage_numbers() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("DATABASE_URL", "postgres://db/prod"),
            ("SECRET_KEY", "s3cr3t"),
            ("SESSION_TTL_HOURS", "not-a-number"),
            ("OMDB_TIMEOUT_SECS", "3"),
        ]);
        let cfg = AppConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.database_url, "postgres://db/prod");
        assert_eq!(cfg.session.secret, "s3cr3t");
        assert_eq!(cfg.session.ttl_hours, 168);
        assert_eq!(cfg.omdb.timeout_secs, 3);
    }

    #[test]
    fn session_ttl_is_capped_at_a_year() {
        let cfg = AppConfig::from_lookup(|k| (k == "SESSION_TTL_HOURS").then(|| "100000000".to_string()));
        assert_eq!(cfg.session.ttl_hours, MAX_SESSION_TTL_HOURS);

        let cfg = AppConfig::from_lookup(|k| (k == "SESSION_TTL_HOURS").then(|| "-5".to_string()));
        assert_eq!(cfg.session.ttl_hours, DEFAULT_SESSION_TTL_HOURS);
    }
}
