use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

pub mod defaults;
pub mod duration_serde;

use defaults::*;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served at the web root for the gallery front-end
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Contents-API URL of the remote tree to catalog
    #[serde(default = "default_contents_url")]
    pub contents_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Total timeout for a single listing request
    #[serde(with = "duration_serde::duration", default = "default_fetch_timeout")]
    pub fetch_timeout: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Durable mirror of the snapshot, read once at startup
    #[serde(default = "default_mirror_path")]
    pub mirror_path: PathBuf,
    /// Period between scheduled refresh cycles
    #[serde(
        with = "duration_serde::duration",
        default = "default_refresh_interval"
    )]
    pub refresh_interval: Duration,
    /// Fetch attempts per refresh cycle
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Fixed wait between failed fetch attempts
    #[serde(with = "duration_serde::duration", default = "default_retry_backoff")]
    pub retry_backoff: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Result count when a search request does not specify a limit
    #[serde(default = "default_search_limit")]
    pub default_limit: usize,
    /// Sample size when a random request does not specify a count
    #[serde(default = "default_random_count")]
    pub default_random_count: usize,
}

// Web defaults
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_static_dir() -> PathBuf {
    PathBuf::from(DEFAULT_STATIC_DIR)
}

// Source defaults
fn default_contents_url() -> String {
    DEFAULT_CONTENTS_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_fetch_timeout() -> Duration {
    DEFAULT_FETCH_TIMEOUT
}

// Cache defaults
fn default_mirror_path() -> PathBuf {
    PathBuf::from(DEFAULT_MIRROR_PATH)
}

fn default_refresh_interval() -> Duration {
    DEFAULT_REFRESH_INTERVAL
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_retry_backoff() -> Duration {
    DEFAULT_RETRY_BACKOFF
}

// Search defaults
fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

fn default_random_count() -> usize {
    DEFAULT_RANDOM_COUNT
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            contents_url: default_contents_url(),
            user_agent: default_user_agent(),
            fetch_timeout: default_fetch_timeout(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            mirror_path: default_mirror_path(),
            refresh_interval: default_refresh_interval(),
            max_retries: default_max_retries(),
            retry_backoff: default_retry_backoff(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_search_limit(),
            default_random_count: default_random_count(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_file =
            std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_from_file(&config_file)
    }

    pub fn load_from_file(config_file: &str) -> Result<Self> {
        if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(config_file)?;
            Ok(toml::from_str(&contents)?)
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file);
            Ok(default_config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_all_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.web.port, DEFAULT_PORT);
        assert_eq!(config.cache.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(config.cache.refresh_interval, DEFAULT_REFRESH_INTERVAL);
        assert_eq!(config.search.default_limit, DEFAULT_SEARCH_LIMIT);
    }

    #[test]
    fn partial_sections_fill_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [web]
            port = 8080

            [cache]
            refresh_interval = "2m"
            retry_backoff = "1s"
            "#,
        )
        .unwrap();

        assert_eq!(config.web.port, 8080);
        assert_eq!(config.web.host, DEFAULT_HOST);
        assert_eq!(config.cache.refresh_interval, Duration::from_secs(120));
        assert_eq!(config.cache.retry_backoff, Duration::from_secs(1));
        assert_eq!(config.cache.max_retries, DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let rendered = toml::to_string_pretty(&Config::default()).unwrap();
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.cache.refresh_interval, DEFAULT_REFRESH_INTERVAL);
        assert_eq!(parsed.source.contents_url, DEFAULT_CONTENTS_URL);
    }
}
