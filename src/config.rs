//! Run configuration.
//!
//! Loaded from YAML, or TOML when the file name ends in `.toml`:
//!
//! ```yaml
//! api_key: "..."            # or MERAKI_DASHBOARD_API_KEY
//! organizations: ["123456"]
//! thresholds:
//!   max_admins: 10
//!   "5G Max Channel Width": 40
//! api:
//!   max_retries: 3
//!   retry_interval: 1
//!   rate_limit: 10
//!   rate_period: 1.0
//! ```

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::error::ConfigError;
use crate::thresholds::Thresholds;

/// Environment variable consulted when `api_key` is absent
pub const API_KEY_ENV: &str = "MERAKI_DASHBOARD_API_KEY";

pub const DEFAULT_BASE_URL: &str = "https://api.meraki.com/api/v1";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api_key: String,
    pub organizations: Vec<String>,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub api: ApiSettings,
}

/// Client and scheduling settings (`api` section).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Total attempts per request
    pub max_retries: u32,
    /// Seconds between attempts
    pub retry_interval: f64,
    /// Requests allowed per `rate_period`
    pub rate_limit: u32,
    pub rate_period: f64,
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout: f64,
    /// Upper bound on networks checked at once; unbounded when absent
    pub max_parallel: Option<usize>,
    /// Deadline in seconds for one network's checks
    pub network_timeout: Option<f64>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            max_retries: 3,
            retry_interval: 1.0,
            rate_limit: 10,
            rate_period: 1.0,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: 30.0,
            max_parallel: None,
            network_timeout: None,
        }
    }
}

fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or_default()
}

impl ApiSettings {
    pub fn retry_delay(&self) -> Duration {
        seconds(self.retry_interval)
    }

    pub fn rate_window(&self) -> Duration {
        seconds(self.rate_period)
    }

    pub fn request_timeout(&self) -> Duration {
        seconds(self.timeout)
    }

    pub fn network_deadline(&self) -> Option<Duration> {
        self.network_timeout.map(seconds)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_retries < 1 {
            return Err(invalid("api.max_retries must be at least 1"));
        }
        check_seconds("api.retry_interval", self.retry_interval, true)?;
        if self.rate_limit < 1 {
            return Err(invalid("api.rate_limit must be at least 1"));
        }
        check_seconds("api.rate_period", self.rate_period, false)?;
        check_seconds("api.timeout", self.timeout, false)?;
        if self.max_parallel == Some(0) {
            return Err(invalid("api.max_parallel must be at least 1"));
        }
        if let Some(limit) = self.network_timeout {
            check_seconds("api.network_timeout", limit, false)?;
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(invalid(format!("api.base_url '{}' is not an http(s) URL", self.base_url)));
        }
        Ok(())
    }
}

/// A seconds value must be representable as a [`Duration`].
fn check_seconds(key: &str, value: f64, allow_zero: bool) -> Result<(), ConfigError> {
    match Duration::try_from_secs_f64(value) {
        Ok(duration) if allow_zero || !duration.is_zero() => Ok(()),
        Ok(_) => Err(invalid(format!("{key} must be a positive number of seconds"))),
        Err(_) => Err(invalid(format!("{key} must be a finite, non-negative number of seconds, got {value}"))),
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(message.into())
}

impl Config {
    /// Read, parse, resolve the API key from the environment, and validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let parsed = if is_toml {
            Config::from_toml_str(&content)
        } else {
            Config::from_yaml_str(&content)
        };
        let mut config = parsed.map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })?;

        config.resolve_api_key(|name| std::env::var(name).ok());
        config.validate()?;
        config.thresholds.warn_unrecognized();

        debug!(
            path = %path.display(),
            organizations = config.organizations.len(),
            "configuration loaded"
        );
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, String> {
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Fill an empty `api_key` from [`API_KEY_ENV`].
    pub fn resolve_api_key<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.api_key.trim().is_empty() {
            if let Some(key) = lookup(API_KEY_ENV) {
                self.api_key = key;
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(invalid(format!(
                "api_key is missing (set it in the config or via {API_KEY_ENV})"
            )));
        }
        if self.organizations.is_empty() {
            return Err(invalid("organizations must list at least one organization id"));
        }
        if let Some(blank) = self.organizations.iter().position(|o| o.trim().is_empty()) {
            return Err(invalid(format!("organizations[{blank}] is empty")));
        }
        self.thresholds.validate()?;
        self.api.validate()
    }
}
