//! Backend sync status for a project.

use anyhow::{Context, Result};
use serde::Serialize;

use super::settings_api;
use crate::cli::output::{create_spinner, output, CommandOutput, TableFormatter};
use crate::domain::models::{Config, DerivedStatus, IntegrationStatus};
use crate::domain::ports::{ProjectId, StatusMap};

/// One integration's status.
#[derive(Debug, Serialize)]
pub struct StatusRow {
    /// Feature name
    pub feature: String,
    /// Display status
    pub status: DerivedStatus,
    /// Backend payload
    #[serde(flatten)]
    pub raw: IntegrationStatus,
}

/// Result of the `status` command.
#[derive(Debug, Serialize)]
pub struct StatusOutput {
    /// Project id
    pub project_id: ProjectId,
    /// Rows sorted by feature
    pub integrations: Vec<StatusRow>,
}

impl StatusOutput {
    /// Rows from a status map, sorted by feature.
    pub fn from_map(project_id: ProjectId, status: StatusMap) -> Self {
        let mut integrations: Vec<StatusRow> = status
            .into_iter()
            .map(|(feature, raw)| StatusRow {
                feature,
                status: raw.derived(),
                raw,
            })
            .collect();
        integrations.sort_by(|a, b| a.feature.cmp(&b.feature));
        Self {
            project_id,
            integrations,
        }
    }
}

impl CommandOutput for StatusOutput {
    fn to_human(&self) -> String {
        if self.integrations.is_empty() {
            return format!("No sync status reported for project {}.", self.project_id);
        }
        let rows: Vec<(String, IntegrationStatus)> = self
            .integrations
            .iter()
            .map(|row| (row.feature.clone(), row.raw.clone()))
            .collect();
        TableFormatter::new().format_status(&rows)
    }
}

/// Fetch and print sync status.
pub async fn execute(project_id: ProjectId, config: &Config, json: bool) -> Result<()> {
    let api = settings_api(config)?;

    let spinner = create_spinner("Fetching sync status...", json);
    let result = api.fetch_integration_status(project_id).await;
    spinner.finish_and_clear();

    let status = result.with_context(|| format!("Failed to fetch status for project {project_id}"))?;
    output(&StatusOutput::from_map(project_id, status), json);
    Ok(())
}
