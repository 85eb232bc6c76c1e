//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use axum::http::HeaderValue;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Bearer token required on mutating endpoints, if set.
    pub api_token: Option<String>,
    /// Browser origin allowed by CORS.
    pub client_origin: HeaderValue,
    /// Upper bound on each generation call.
    pub generation_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `ONBOARDING_ADDR` | Server bind address | `127.0.0.1:3001` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:data/onboarding.db?mode=rwc` |
    /// | `ONBOARDING_API_TOKEN` | Bearer token for mutating endpoints | (unset, open) |
    /// | `CLIENT_ORIGIN` | Allowed CORS origin | `http://localhost:3000` |
    /// | `GENERATION_TIMEOUT_SECS` | Generation timeout in seconds | `60` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("ONBOARDING_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3001".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = env::var("SQLITE_PATH")
            .unwrap_or_else(|_| "sqlite:data/onboarding.db?mode=rwc".to_string());

        let api_token = env::var("ONBOARDING_API_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());

        let client_origin = env::var("CLIENT_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidOrigin)?;

        let generation_timeout = match env::var("GENERATION_TIMEOUT_SECS") {
            Ok(value) => value
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::InvalidTimeout)?,
            Err(_) => onboarding::DEFAULT_GENERATION_TIMEOUT,
        };

        Ok(Self {
            addr,
            database_url,
            api_token,
            client_origin,
            generation_timeout,
        })
    }

    /// Directory that must exist before a file database can be created.
    pub fn database_dir(&self) -> Option<PathBuf> {
        sqlite_file_path(&self.database_url)?
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(PathBuf::from)
    }
}

/// File path inside a `sqlite:` URL, or `None` for in-memory databases.
fn sqlite_file_path(url: &str) -> Option<PathBuf> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();

    if path.is_empty() || path == ":memory:" || url.contains("mode=memory") {
        None
    } else {
        Some(PathBuf::from(path))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid ONBOARDING_ADDR format")]
    InvalidAddr,

    #[error("Invalid CLIENT_ORIGIN header value")]
    InvalidOrigin,

    #[error("GENERATION_TIMEOUT_SECS must be a positive integer")]
    InvalidTimeout,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const VARS: [&str; 5] = [
        "ONBOARDING_ADDR",
        "SQLITE_PATH",
        "ONBOARDING_API_TOKEN",
        "CLIENT_ORIGIN",
        "GENERATION_TIMEOUT_SECS",
    ];

    #[test]
    fn test_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        for var in VARS {
            env::remove_var(var);
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.addr.to_string(), "127.0.0.1:3001");
        assert_eq!(config.database_url, "sqlite:data/onboarding.db?mode=rwc");
        assert!(config.api_token.is_none());
        assert_eq!(config.client_origin, "http://localhost:3000");
        assert_eq!(config.generation_timeout, Duration::from_secs(60));
        assert_eq!(config.database_dir(), Some(PathBuf::from("data")));
    }

    #[test]
    fn test_overrides_and_invalid_values() {
        let _guard = ENV_LOCK.lock().unwrap();
        for var in VARS {
            env::remove_var(var);
        }

        env::set_var("ONBOARDING_API_TOKEN", "secret");
        env::set_var("GENERATION_TIMEOUT_SECS", "5");
        let config = Config::from_env().unwrap();
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(config.generation_timeout, Duration::from_secs(5));

        env::set_var("GENERATION_TIMEOUT_SECS", "0");
        assert!(matches!(Config::from_env(), Err(ConfigError::InvalidTimeout)));
        env::remove_var("GENERATION_TIMEOUT_SECS");

        env::set_var("ONBOARDING_ADDR", "not an address");
        assert!(matches!(Config::from_env(), Err(ConfigError::InvalidAddr)));

        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_sqlite_file_path() {
        assert_eq!(
            sqlite_file_path("sqlite:data/onboarding.db?mode=rwc"),
            Some(PathBuf::from("data/onboarding.db"))
        );
        assert_eq!(
            sqlite_file_path("sqlite:///var/lib/onboarding.db"),
            Some(PathBuf::from("/var/lib/onboarding.db"))
        );
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path("sqlite:file:test?mode=memory"), None);
        assert_eq!(sqlite_file_path("postgres://localhost"), None);
    }
}
