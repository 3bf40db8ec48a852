//! Default dashboard creation after an integration is connected.
//!
//! Connecting a provider usually triggers a burst of settings updates. The
//! scheduler waits out a debounce delay and then asks the backend to create
//! the project's default dashboards once; triggers that arrive while that is
//! in flight share its result.

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::domain::errors::ApiError;
use crate::domain::models::DashboardConfig;
use crate::domain::ports::{ProjectId, SettingsApi};
use crate::services::single_flight::SingleFlight;

/// Single-flight dashboard-from-template creation, keyed by project.
#[derive(Debug)]
pub struct DashboardTemplateScheduler {
    api: Arc<dyn SettingsApi>,
    debounce: Duration,
    enabled: bool,
    flights: SingleFlight<ProjectId, Result<(), ApiError>>,
}

impl DashboardTemplateScheduler {
    /// Scheduler honouring `config.enabled` and `config.debounce_ms`.
    pub fn new(api: Arc<dyn SettingsApi>, config: &DashboardConfig) -> Self {
        Self {
            api,
            debounce: Duration::from_millis(config.debounce_ms),
            enabled: config.enabled,
            flights: SingleFlight::new(),
        }
    }

    /// Debounce, then create the default dashboards for `project_id` once.
    pub async fn ensure_default_dashboards(&self, project_id: ProjectId) -> Result<(), ApiError> {
        if !self.enabled {
            return Ok(());
        }

        let api = Arc::clone(&self.api);
        let debounce = self.debounce;
        self.flights
            .run(project_id, move || async move {
                tokio::time::sleep(debounce).await;
                match api.create_default_dashboards(project_id).await {
                    Ok(()) => {
                        info!(project_id, "Default dashboards created from templates");
                        Ok(())
                    }
                    Err(err) => {
                        warn!(project_id, error = %err, "Failed to create default dashboards");
                        Err(err)
                    }
                }
            })
            .await
    }

    /// Whether a creation for `project_id` is waiting or running.
    pub async fn is_scheduled(&self, project_id: ProjectId) -> bool {
        self.flights.is_in_flight(&project_id).await
    }
}
