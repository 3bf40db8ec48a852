//! Application configuration model.

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Backend API connection
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Agents allowed to see internal integrations and sync diagnostics
    #[serde(default)]
    pub access: AccessConfig,

    /// Dashboard-from-template creation after an integration is enabled
    #[serde(default)]
    pub dashboards: DashboardConfig,

    /// OAuth redirect settings
    #[serde(default)]
    pub oauth: OAuthConfig,

    /// Route locked cards send the user to
    #[serde(default = "default_pricing_route")]
    pub pricing_route: String,
}

fn default_pricing_route() -> String {
    "/pricing".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            logging: LoggingConfig::default(),
            access: AccessConfig::default(),
            dashboards: DashboardConfig::default(),
            oauth: OAuthConfig::default(),
            pricing_route: default_pricing_route(),
        }
    }
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ApiConfig {
    /// Base URL of the backend, without a trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token sent with every request
    #[serde(default)]
    pub api_token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stderr only when unset
    #[serde(default)]
    pub log_dir: Option<String>,

    /// Rotation for file output: daily, hourly, never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

/// Internal agent allow-list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AccessConfig {
    /// Exact agent emails
    #[serde(default)]
    pub internal_emails: Vec<String>,

    /// Email domains, without the `@`
    #[serde(default)]
    pub internal_domains: Vec<String>,
}

/// Dashboard template scheduling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DashboardConfig {
    /// Create default dashboards after an integration is connected
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Delay before creation, so bursts of settings updates collapse into one
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

const fn default_true() -> bool {
    true
}

const fn default_debounce_ms() -> u64 {
    2000
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// OAuth configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OAuthConfig {
    /// Where providers send the browser back to
    #[serde(default = "default_redirect_base")]
    pub redirect_base: String,

    /// Opaque `state` value echoed back by direct-consent providers
    #[serde(default = "default_state")]
    pub state: String,

    /// LinkedIn application client id
    #[serde(default)]
    pub linkedin_client_id: Option<String>,
}

fn default_redirect_base() -> String {
    "http://localhost:3000".to_string()
}

fn default_state() -> String {
    "integration-settings".to_string()
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            redirect_base: default_redirect_base(),
            state: default_state(),
            linkedin_client_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_yaml() {
        let config: Config = serde_yaml::from_str("{}").expect("empty yaml should parse");
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.dashboards.debounce_ms, 2000);
        assert_eq!(config.pricing_route, "/pricing");
        assert!(config.access.internal_domains.is_empty());
    }

    #[test]
    fn test_programmatic_default_matches_serde_default() {
        let config = Config::default();
        assert_eq!(config.pricing_route, "/pricing");
        assert_eq!(config.oauth.state, "integration-settings");
        assert!(config.dashboards.enabled);
    }
}
