//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::bulk::SubmitConfig;
use crate::client::ApiClientConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub import: ImportConfig,

    #[serde(default)]
    pub submission: SubmissionConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote employee API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    pub token: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_request_timeout() -> u64 {
    30_000
}

fn default_max_retries() -> u32 {
    3
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout(),
            max_retries: default_max_retries(),
            token: None,
        }
    }
}

impl From<&ApiConfig> for ApiClientConfig {
    fn from(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            token: config.token.clone(),
            request_timeout_ms: config.request_timeout_ms,
            max_retries: config.max_retries,
        }
    }
}

/// File import configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    /// Keep unparseable start dates as typed so validation reports them
    #[serde(default = "default_strict_dates")]
    pub strict_dates: bool,
}

fn default_strict_dates() -> bool {
    true
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            strict_dates: default_strict_dates(),
        }
    }
}

/// Bulk submission configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionConfig {
    /// Records per request; unset sends the whole batch at once
    pub chunk_size: Option<usize>,

    #[serde(default = "default_chunk_delay")]
    pub chunk_delay_ms: u64,

    #[serde(default = "default_reset_delay")]
    pub reset_delay_ms: u64,
}

fn default_chunk_delay() -> u64 {
    200
}

fn default_reset_delay() -> u64 {
    2000
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            chunk_size: None,
            chunk_delay_ms: default_chunk_delay(),
            reset_delay_ms: default_reset_delay(),
        }
    }
}

impl From<&SubmissionConfig> for SubmitConfig {
    fn from(config: &SubmissionConfig) -> Self {
        Self {
            chunk_size: config.chunk_size.filter(|n| *n > 0),
            chunk_delay: Duration::from_millis(config.chunk_delay_ms),
            reset_delay: Duration::from_millis(config.reset_delay_ms),
        }
    }
}

/// Local employee store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("roster").to_string_lossy().to_string())
        .unwrap_or_else(|| "./roster_data".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("roster").join("config.toml")),
            Some(PathBuf::from("./roster.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!(path = %path.display(), "Loaded config");
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to load config");
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // API overrides
        if let Some(url) = var("ROSTER_API_URL") {
            self.api.base_url = url;
        }
        if let Some(token) = var("ROSTER_API_TOKEN") {
            self.api.token = Some(token).filter(|t| !t.is_empty());
        }

        // Storage overrides
        if let Some(data_dir) = var("ROSTER_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }

        // Submission overrides
        if let Some(size) = var("ROSTER_CHUNK_SIZE") {
            if let Ok(n) = size.parse() {
                self.submission.chunk_size = Some(n);
            }
        }

        // Logging overrides
        if let Some(level) = var("ROSTER_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("ROSTER_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Client settings for the remote API
    pub fn api_client(&self) -> ApiClientConfig {
        ApiClientConfig::from(&self.api)
    }

    /// Coordinator settings
    pub fn submit(&self) -> SubmitConfig {
        SubmitConfig::from(&self.submission)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Roster Configuration
#
# Environment variables override these settings:
# - ROSTER_API_URL
# - ROSTER_API_TOKEN
# - ROSTER_DATA_DIR
# - ROSTER_CHUNK_SIZE
# - ROSTER_LOG_LEVEL
# - ROSTER_LOG_FORMAT

[api]
# Employee API base URL, including the /api prefix
base_url = "http://localhost:5000/api"

# Request timeout in milliseconds
request_timeout_ms = 30000

# Attempts for read requests (bulk create is never retried)
max_retries = 3

# Bearer token for the company session
# token = ""

[import]
# Keep unparseable start dates as typed so validation reports them.
# When false they are blanked instead.
strict_dates = true

[submission]
# Split large batches into requests of this many records
# chunk_size = 20

# Pause between chunked requests (ms)
chunk_delay_ms = 200

# How long a success stays visible before resetting (ms)
reset_delay_ms = 2000

[storage]
# Directory for the local employee lists
data_dir = "~/.local/share/roster"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:5000/api");
        assert!(config.import.strict_dates);
        assert_eq!(config.submission.chunk_size, None);

        let submit = config.submit();
        assert_eq!(submit.reset_delay, Duration::from_secs(2));
        assert_eq!(submit.chunk_delay, Duration::from_millis(200));
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.api.max_retries, 3);
        assert_eq!(config.submission.reset_delay_ms, 2000);
        assert_eq!(config.logging.format, "pretty");
        assert!(config.api.token.is_none());
    }

    #[test]
    fn test_partial_file() {
        let config = Config::parse(
            r#"
            [api]
            base_url = "https://hr.example.com/api"
            token = "abc"

            [submission]
            chunk_size = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.api.request_timeout_ms, 30_000);
        let client = config.api_client();
        assert_eq!(client.base_url, "https://hr.example.com/api");
        assert_eq!(client.token.as_deref(), Some("abc"));
        assert_eq!(config.submit().chunk_size, None);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("ROSTER_API_URL", "http://api.test"),
            ("ROSTER_CHUNK_SIZE", "25"),
            ("ROSTER_LOG_FORMAT", "json"),
            ("ROSTER_API_TOKEN", ""),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.api.token = Some("old".into());
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "http://api.test");
        assert_eq!(config.submission.chunk_size, Some(25));
        assert_eq!(config.logging.format, "json");
        assert!(config.api.token.is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/roster.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
