use crate::model::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://dummyjson.com/products/search";
pub const DEFAULT_LIMIT: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: f64 = 10.0;
pub const DEFAULT_MIN_SCORE: f64 = 0.45;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

/// Settings a matcher is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    pub base_url: String,
    pub limit: usize,
    pub timeout_secs: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            limit: DEFAULT_LIMIT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl MatcherConfig {
    pub fn new(base_url: impl Into<String>, limit: usize, timeout_secs: f64) -> Self {
        Self {
            base_url: base_url.into(),
            limit,
            timeout_secs,
        }
    }

    /// Checks the settings and returns the per-request timeout.
    pub fn validate(&self) -> Result<Duration, ConfigError> {
        if self.limit == 0 {
            return Err(ConfigError::InvalidLimit);
        }
        if !(self.timeout_secs.is_finite() && self.timeout_secs > 0.0) {
            return Err(ConfigError::InvalidTimeout);
        }
        Duration::try_from_secs_f64(self.timeout_secs).map_err(|_| ConfigError::InvalidTimeout)
    }
}

/// File-level configuration shared by the CLI and the portal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub limit: usize,
    pub timeout_secs: f64,
    pub min_score: f64,
    pub host: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            limit: DEFAULT_LIMIT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            min_score: DEFAULT_MIN_SCORE,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl AppConfig {
    pub fn matcher_config(&self) -> MatcherConfig {
        MatcherConfig::new(self.base_url.clone(), self.limit, self.timeout_secs)
    }
}

/// Reads a JSON config file; missing keys fall back to the defaults.
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}

pub fn validate_min_score(min_score: f64) -> Result<f64, ConfigError> {
    if (0.0..=1.0).contains(&min_score) {
        Ok(min_score)
    } else {
        Err(ConfigError::InvalidMinScore(min_score))
    }
}
