//! Configuration management infrastructure
//!
//! Hierarchical configuration using figment:
//! - Programmatic defaults
//! - Project YAML files under `.integration-settings/`
//! - `INTEGRATION_SETTINGS_*` environment variable overrides
//! - Validation after merging

pub mod loader;

pub use loader::{ConfigError, ConfigLoader};
