//! Backend API port.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::domain::errors::ApiError;
use crate::domain::models::{
    IntegrationId, IntegrationStatus, PlanEntitlements, ProjectSettings, SettingsPatch,
};

/// Numeric project identifier used in every project-scoped path.
pub type ProjectId = u64;

/// Sync status keyed by feature name (`int_hubspot`, ...; `sdk` for the SDK).
pub type StatusMap = HashMap<String, IntegrationStatus>;

/// Result alias for port calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Backend API used by the integrations settings page.
///
/// Every call is a single request; implementations must not retry.
#[async_trait]
pub trait SettingsApi: Send + Sync {
    /// `GET /projects/{id}/settings`
    async fn fetch_project_settings(&self, project_id: ProjectId) -> ApiResult<ProjectSettings>;

    /// `PUT /projects/{id}/settings`, returning the stored settings.
    async fn update_project_settings(
        &self,
        project_id: ProjectId,
        patch: &SettingsPatch,
    ) -> ApiResult<ProjectSettings>;

    /// `GET /projects/{id}/v1/settings`
    async fn fetch_plan_entitlements(&self, project_id: ProjectId) -> ApiResult<PlanEntitlements>;

    /// `GET /projects/{id}/v1/integrations/status`
    async fn fetch_integration_status(&self, project_id: ProjectId) -> ApiResult<StatusMap>;

    /// `DELETE /projects/{id}/integrations/{provider}`
    async fn disable_integration(
        &self,
        project_id: ProjectId,
        integration: IntegrationId,
    ) -> ApiResult<()>;

    /// `POST /integrations/{provider}/auth`, returning the consent URL.
    async fn begin_oauth(
        &self,
        project_id: ProjectId,
        integration: IntegrationId,
        return_url: &str,
    ) -> ApiResult<String>;

    /// `POST /projects/{id}/v1/dashboard_templates/defaults`
    async fn create_default_dashboards(&self, project_id: ProjectId) -> ApiResult<()>;
}

impl std::fmt::Debug for dyn SettingsApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn SettingsApi")
    }
}
