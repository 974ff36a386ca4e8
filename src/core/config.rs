use anyhow::{Context, Result};
use chrono::TimeDelta;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ExchangeRatesProviderConfig {
    pub base_url: String,
    pub retries: usize,
    pub retry_delay_ms: u64,
    pub timeout_secs: u64,
}

impl Default for ExchangeRatesProviderConfig {
    fn default() -> Self {
        ExchangeRatesProviderConfig {
            base_url: "https://api.exchangerate-api.com".to_string(),
            retries: 3,
            retry_delay_ms: 500,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct AlphaVantageProviderConfig {
    pub base_url: String,
    pub api_key: String,
}

impl Default for AlphaVantageProviderConfig {
    fn default() -> Self {
        AlphaVantageProviderConfig {
            base_url: "https://www.alphavantage.co".to_string(),
            api_key: "demo".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ProvidersConfig {
    pub exchange_rates: ExchangeRatesProviderConfig,
    pub alpha_vantage: AlphaVantageProviderConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Display currency. Detected from the locale when unset.
    pub currency: Option<String>,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            currency: None,
            providers: ProvidersConfig::default(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl AppConfig {
    /// Loads the config at `path`, or the default location. A missing default
    /// config file yields the built-in defaults; a missing explicit path is an
    /// error.
    pub fn load(path: Option<&str>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    /// The rate cache TTL. Values chrono cannot represent are rejected.
    pub fn cache_ttl(&self) -> Result<TimeDelta> {
        i64::try_from(self.cache_ttl_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .with_context(|| format!("cache_ttl_secs is out of range: {}", self.cache_ttl_secs))
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("app", "stockgift", "stockgift")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
