//! Application configuration loaded from environment variables.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::api::server::ApiServerConfig;
use crate::credentials::DEFAULT_SYNC_CONCURRENCY;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:page-keeper.db?mode=rwc";
pub const DEFAULT_AUTHORITY_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub api: ApiServerConfig,
    pub graph_base_url: String,
    /// Per-request timeout for authority calls.
    pub authority_timeout: Duration,
    pub sync_concurrency: usize,
    /// `None` disables the background sweep.
    pub sweep_interval: Option<Duration>,
    pub log_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            api: ApiServerConfig::default(),
            graph_base_url: graph_client::DEFAULT_BASE_URL.to_string(),
            authority_timeout: Duration::from_secs(DEFAULT_AUTHORITY_TIMEOUT_SECS),
            sync_concurrency: DEFAULT_SYNC_CONCURRENCY,
            sweep_interval: Some(Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS)),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}

fn parse_or_default<T: FromStr + Copy>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(value) if !value.trim().is_empty() => match value.trim().parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(key, value = %value, "Invalid value, using default");
                default
            }
        },
        _ => default,
    }
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup, falling back to defaults.
    ///
    /// Supported keys:
    /// - `DATABASE_URL`
    /// - `API_BIND_ADDRESS`, `API_PORT`, `API_ENABLE_CORS`
    /// - `GRAPH_API_BASE_URL`, `AUTHORITY_TIMEOUT_SECS`
    /// - `SYNC_CONCURRENCY` (min 1)
    /// - `SWEEP_INTERVAL_SECS` (`0` disables the sweep scheduler)
    /// - `LOG_DIR`
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = non_empty(lookup("DATABASE_URL")) {
            config.database_url = url;
        }

        if let Some(bind_address) = non_empty(lookup("API_BIND_ADDRESS")) {
            config.api.bind_address = bind_address;
        }
        config.api.port = parse_or_default("API_PORT", lookup("API_PORT"), config.api.port);
        config.api.enable_cors = parse_or_default(
            "API_ENABLE_CORS",
            lookup("API_ENABLE_CORS"),
            config.api.enable_cors,
        );

        if let Some(base_url) = non_empty(lookup("GRAPH_API_BASE_URL")) {
            config.graph_base_url = base_url;
        }
        config.authority_timeout = Duration::from_secs(parse_or_default(
            "AUTHORITY_TIMEOUT_SECS",
            lookup("AUTHORITY_TIMEOUT_SECS"),
            DEFAULT_AUTHORITY_TIMEOUT_SECS,
        ));

        config.sync_concurrency = parse_or_default(
            "SYNC_CONCURRENCY",
            lookup("SYNC_CONCURRENCY"),
            DEFAULT_SYNC_CONCURRENCY,
        )
        .max(1);

        let sweep_secs = parse_or_default(
            "SWEEP_INTERVAL_SECS",
            lookup("SWEEP_INTERVAL_SECS"),
            DEFAULT_SWEEP_INTERVAL_SECS,
        );
        config.sweep_interval = (sweep_secs > 0).then(|| Duration::from_secs(sweep_secs));

        if let Some(dir) = non_empty(lookup("LOG_DIR")) {
            config.log_dir = PathBuf::from(dir);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.api.bind_address, "0.0.0.0");
        assert_eq!(config.api.port, 5000);
        assert!(config.api.enable_cors);
        assert_eq!(config.graph_base_url, "https://graph.facebook.com/v18.0");
        assert_eq!(config.authority_timeout, Duration::from_secs(15));
        assert_eq!(config.sync_concurrency, 4);
        assert_eq!(config.sweep_interval, Some(Duration::from_secs(300)));
        assert_eq!(config.log_dir, PathBuf::from("logs"));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("API_BIND_ADDRESS", "127.0.0.1"),
            ("API_PORT", "8080"),
            ("API_ENABLE_CORS", "false"),
            ("GRAPH_API_BASE_URL", "http://localhost:9000/v1"),
            ("AUTHORITY_TIMEOUT_SECS", "3"),
            ("SYNC_CONCURRENCY", "8"),
            ("SWEEP_INTERVAL_SECS", "60"),
            ("LOG_DIR", "/var/log/page-keeper"),
        ]);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.api.bind_address, "127.0.0.1");
        assert_eq!(config.api.port, 8080);
        assert!(!config.api.enable_cors);
        assert_eq!(config.graph_base_url, "http://localhost:9000/v1");
        assert_eq!(config.authority_timeout, Duration::from_secs(3));
        assert_eq!(config.sync_concurrency, 8);
        assert_eq!(config.sweep_interval, Some(Duration::from_secs(60)));
        assert_eq!(config.log_dir, PathBuf::from("/var/log/page-keeper"));
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = config_from(&[
            ("API_PORT", "not-a-port"),
            ("SYNC_CONCURRENCY", "-2"),
            ("AUTHORITY_TIMEOUT_SECS", ""),
        ]);
        assert_eq!(config.api.port, 5000);
        assert_eq!(config.sync_concurrency, 4);
        assert_eq!(config.authority_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_zero_disables_sweep_and_concurrency_has_floor() {
        let config = config_from(&[("SWEEP_INTERVAL_SECS", "0"), ("SYNC_CONCURRENCY", "0")]);
        assert_eq!(config.sweep_interval, None);
        assert_eq!(config.sync_concurrency, 1);
    }
}
