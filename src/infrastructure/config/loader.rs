//! Layered configuration loading and validation.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;
use url::Url;

use crate::domain::models::config::Config;

/// Directory holding project configuration, relative to the working directory
pub const CONFIG_DIR: &str = ".integration-settings";

/// Prefix for environment variable overrides (`__` separates nested keys)
pub const ENV_PREFIX: &str = "INTEGRATION_SETTINGS_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Log level outside the supported set
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Log format outside the supported set
    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    /// Rotation policy outside the supported set
    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    /// `api.base_url` is blank
    #[error("API base URL cannot be empty")]
    EmptyBaseUrl,

    /// `api.base_url` does not parse
    #[error("Invalid API base URL '{0}': {1}")]
    InvalidBaseUrl(String, String),

    /// `api.timeout_secs` is zero
    #[error("Invalid timeout_secs: {0}. Must be at least 1")]
    InvalidTimeout(u64),

    /// `pricing_route` is not an absolute path
    #[error("Invalid pricing route '{0}'. Must start with '/'")]
    InvalidPricingRoute(String),

    /// Any other rule
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .integration-settings/config.yaml (project config)
    /// 3. .integration-settings/local.yaml (local overrides, optional)
    /// 4. Environment variables (INTEGRATION_SETTINGS_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        Self::load_from_dir(CONFIG_DIR)
    }

    /// Same precedence as [`ConfigLoader::load`], rooted at `dir`.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Config> {
        let dir = dir.as_ref();
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(dir.join("config.yaml")))
            .merge(Yaml::file(dir.join("local.yaml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file. Environment overrides still apply.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let base_url = config.api.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if let Err(err) = Url::parse(base_url) {
            return Err(ConfigError::InvalidBaseUrl(
                base_url.to_string(),
                err.to_string(),
            ));
        }
        if config.api.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(config.api.timeout_secs));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        if !config.pricing_route.starts_with('/') {
            return Err(ConfigError::InvalidPricingRoute(config.pricing_route.clone()));
        }

        if config.oauth.state.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "oauth.state cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
