//! Connect, disconnect and OAuth consent commands.
//!
//! Each command mounts a settings page session for the project and runs the
//! mutation through it, so the refetch and dashboard rules match the page.

use anyhow::Result;
use serde::Serialize;

use super::settings_api;
use crate::cli::output::{create_spinner, output, CommandOutput};
use crate::domain::errors::FieldError;
use crate::domain::models::{Config, IntegrationId};
use crate::domain::ports::ProjectId;
use crate::services::{FormValues, MutationError, Notification, SettingsPage, Viewer};

/// Result of `connect` and `disconnect`.
#[derive(Debug, Serialize)]
pub struct MutationOutput {
    /// Project id
    pub project_id: ProjectId,
    /// Integration acted on
    pub integration: IntegrationId,
    /// Toast the page would show
    pub notification: Notification,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    /// Inline validation errors
    pub field_errors: Vec<FieldError>,
}

impl CommandOutput for MutationOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.notification.message().to_string()];
        for error in &self.field_errors {
            lines.push(format!("  {}: {}", error.field, error.message));
        }
        lines.join("\n")
    }
}

/// Result of `oauth-url`.
#[derive(Debug, Serialize)]
pub struct OAuthUrlOutput {
    /// OAuth provider
    pub integration: IntegrationId,
    /// Consent page URL
    pub url: String,
}

impl CommandOutput for OAuthUrlOutput {
    fn to_human(&self) -> String {
        format!("Open this URL to authorize {}:\n{}", self.integration, self.url)
    }
}

async fn mount(project_id: ProjectId, config: &Config, json: bool) -> Result<SettingsPage> {
    let api = settings_api(config)?;
    let spinner = create_spinner("Loading integration settings...", json);
    let page = SettingsPage::mount(api, project_id, Viewer::default(), config, None).await;
    spinner.finish_and_clear();
    Ok(page)
}

/// Print the failure the way the page would toast it, then fail the command.
fn report_failure(
    project_id: ProjectId,
    integration: IntegrationId,
    err: MutationError,
    json: bool,
) -> anyhow::Error {
    let out = MutationOutput {
        project_id,
        integration,
        notification: err.notification(),
        field_errors: err.field_errors().to_vec(),
    };
    if !out.field_errors.is_empty() {
        output(&out, json);
    }
    anyhow::Error::new(err).context(format!("Failed to update {integration}"))
}

/// Enable an integration from form values.
pub async fn execute_connect(
    project_id: ProjectId,
    integration: IntegrationId,
    fields: Vec<(String, String)>,
    config: &Config,
    json: bool,
) -> Result<()> {
    let page = mount(project_id, config, json).await?;
    let values: FormValues = fields.into_iter().collect();

    let notification = page
        .mutations()
        .connect(integration, &values)
        .await
        .map_err(|err| report_failure(project_id, integration, err, json))?;

    // The page schedules dashboard creation in the background; wait for it
    // before the process exits.
    if let Err(err) = page
        .mutations()
        .dashboards()
        .ensure_default_dashboards(project_id)
        .await
    {
        tracing::warn!(project_id, error = %err, "Default dashboards were not created");
    }

    output(
        &MutationOutput {
            project_id,
            integration,
            notification,
            field_errors: Vec::new(),
        },
        json,
    );
    Ok(())
}

/// Turn an integration off.
pub async fn execute_disconnect(
    project_id: ProjectId,
    integration: IntegrationId,
    config: &Config,
    json: bool,
) -> Result<()> {
    let page = mount(project_id, config, json).await?;
    let notification = page
        .mutations()
        .disconnect(integration)
        .await
        .map_err(|err| report_failure(project_id, integration, err, json))?;

    output(
        &MutationOutput {
            project_id,
            integration,
            notification,
            field_errors: Vec::new(),
        },
        json,
    );
    Ok(())
}

/// Print the consent URL for an OAuth provider.
pub async fn execute_oauth_url(
    project_id: ProjectId,
    integration: IntegrationId,
    return_url: Option<String>,
    config: &Config,
    json: bool,
) -> Result<()> {
    let page = mount(project_id, config, json).await?;
    let return_url =
        return_url.unwrap_or_else(|| config.oauth.redirect_base.trim_end_matches('/').to_string());

    let url = page
        .mutations()
        .begin_oauth(integration, &return_url)
        .await
        .map_err(|err| report_failure(project_id, integration, err, json))?;

    output(&OAuthUrlOutput { integration, url }, json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutation_output_lists_field_errors() {
        let out = MutationOutput {
            project_id: 1,
            integration: IntegrationId::LeadSquared,
            notification: Notification::Error("Validation failed".to_string()),
            field_errors: vec![FieldError::required("int_leadsquared_host", "Host")],
        };
        assert_eq!(out.to_human(), "Validation failed\n  int_leadsquared_host: Please enter Host");
        assert_eq!(out.to_json()["integration"], "lead_squared");
    }
}
