//! Configuration management for querylens.
//!
//! Handles loading configuration from TOML files and environment variables,
//! and resolving the effective settings from all sources.

use crate::error::{QueryLensError, Result};
use crate::service::http::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};
use crate::service::HttpServiceConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the service endpoint.
pub const ENDPOINT_ENV: &str = "QUERYLENS_ENDPOINT";

/// Environment variable supplying a default database locator.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Main configuration structure for querylens.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Query service settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Display settings.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Prefilled input values.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Query service configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ServiceConfig {
    /// Full URL of the query endpoint.
    pub endpoint: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// Display configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayConfig {
    /// Append the service notices section after the response sections.
    #[serde(default = "default_show_diagnostics")]
    pub show_diagnostics: bool,
}

fn default_show_diagnostics() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_diagnostics: default_show_diagnostics(),
        }
    }
}

/// Values used to prefill the inputs.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DefaultsConfig {
    /// Database locator shown in the input on startup.
    pub database_url: Option<String>,
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("querylens")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the default configuration.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| QueryLensError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            QueryLensError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}

/// Values given on the command line. `None` means not given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
    pub database_url: Option<String>,
}

/// Effective settings after merging all sources.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub endpoint: String,
    pub timeout_secs: u64,
    pub show_diagnostics: bool,
    pub database_url: Option<String>,
}

impl Settings {
    /// Resolves settings from the CLI, the process environment and the file.
    pub fn resolve(overrides: &Overrides, config: &Config) -> Result<Self> {
        Self::resolve_with_env(overrides, config, |key| std::env::var(key).ok())
    }

    /// Resolves settings with precedence CLI > env > config file > default.
    ///
    /// Empty environment values are ignored. The endpoint is validated.
    pub fn resolve_with_env(
        overrides: &Overrides,
        config: &Config,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let lookup = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let endpoint = overrides
            .endpoint
            .clone()
            .or_else(|| lookup(ENDPOINT_ENV))
            .or_else(|| config.service.endpoint.clone())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let timeout_secs = overrides
            .timeout_secs
            .or(config.service.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        if timeout_secs == 0 {
            return Err(QueryLensError::config("timeout_secs must be greater than 0"));
        }

        let database_url = overrides
            .database_url
            .clone()
            .or_else(|| lookup(DATABASE_URL_ENV))
            .or_else(|| config.defaults.database_url.clone());

        let settings = Self {
            endpoint,
            timeout_secs,
            show_diagnostics: config.display.show_diagnostics,
            database_url,
        };
        settings.service_config()?;
        Ok(settings)
    }

    /// Builds the HTTP client configuration.
    pub fn service_config(&self) -> Result<HttpServiceConfig> {
        Ok(HttpServiceConfig::new(&self.endpoint)?.with_timeout(self.timeout_secs))
    }
}
