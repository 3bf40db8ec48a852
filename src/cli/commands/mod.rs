//! CLI command handlers

pub mod callback;
pub mod cards;
pub mod catalog;
pub mod connect;
pub mod status;

use anyhow::Result;
use std::sync::Arc;

use crate::domain::models::Config;
use crate::domain::ports::SettingsApi;
use crate::infrastructure::http::HttpSettingsApi;

/// Backend client for commands that talk to the API.
pub(crate) fn settings_api(config: &Config) -> Result<Arc<dyn SettingsApi>> {
    Ok(Arc::new(HttpSettingsApi::new(&config.api)?))
}
