//! Connect and disconnect operations for one settings page.
//!
//! Each (project, integration) pair allows a single mutation in flight; a
//! second request while one is pending is refused without touching the
//! network. Connecting an integration the plan does not grant is refused the
//! same way, unless the project was already connected before a downgrade. A
//! successful mutation refetches settings and status exactly once each.
//! Failures are reported and never retried.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::errors::{ApiError, DomainError, FieldError};
use crate::domain::models::{
    CredentialField, IntegrationDescriptor, IntegrationId, OAuthConfig, OAuthFlow, ProjectSettings,
    ProviderForm, SettingsPatch,
};
use crate::domain::ports::{ProjectId, SettingsApi};
use crate::services::callback::direct_consent_url;
use crate::services::dashboards::DashboardTemplateScheduler;
use crate::services::feature_lock::FeatureLockResolver;
use crate::services::registry::IntegrationRegistry;
use crate::services::settings_page::{SettingsState, SettingsStore};
use crate::services::status::StatusContext;

/// Toast shown after a mutation settles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum Notification {
    /// Green toast
    Success(String),
    /// Red toast
    Error(String),
}

impl Notification {
    /// Toast text.
    pub fn message(&self) -> &str {
        match self {
            Self::Success(message) | Self::Error(message) => message,
        }
    }

    /// Whether this is a success toast.
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Why a connect, disconnect or OAuth start did not happen.
#[derive(Debug, Error)]
pub enum MutationError {
    /// Another mutation for the same integration has not settled
    #[error("A request for {integration} is already in progress")]
    InFlight {
        /// Integration with the pending request
        integration: IntegrationId,
    },

    /// The plan does not grant the integration and it is not connected
    #[error("{name} is not available on your current plan")]
    Locked {
        /// Locked integration
        integration: IntegrationId,
        /// Display name
        name: &'static str,
    },

    /// Lookup or validation failure
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Backend call failed
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl MutationError {
    /// Error toast for this failure.
    pub fn notification(&self) -> Notification {
        match self {
            Self::Api(err) => Notification::Error(err.user_message()),
            Self::InFlight { .. } | Self::Locked { .. } | Self::Domain(_) => {
                Notification::Error(self.to_string())
            }
        }
    }

    /// Inline field errors, when the failure was form validation.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Domain(DomainError::Validation(errors)) => errors,
            _ => &[],
        }
    }
}

/// Values typed into a provider form, keyed by settings key.
pub type FormValues = HashMap<String, String>;

/// Required-field validation for providers configured by typed credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialForm {
    /// Provider the form belongs to
    pub integration: IntegrationId,
    /// Settings flag that marks the provider enabled
    pub flag: &'static str,
    /// Required inputs; empty for toggles
    pub fields: &'static [CredentialField],
}

impl CredentialForm {
    /// Form for `integration`, when it owns a settings flag.
    pub fn for_integration(integration: IntegrationId) -> Option<Self> {
        match integration.form() {
            ProviderForm::Credentials { flag, fields } => Some(Self {
                integration,
                flag,
                fields,
            }),
            ProviderForm::Toggle { flag } => Some(Self {
                integration,
                flag,
                fields: &[],
            }),
            ProviderForm::SdkSnippet | ProviderForm::OAuth { .. } => None,
        }
    }

    /// Check every field is filled in and build the settings update.
    pub fn validate(&self, values: &FormValues) -> Result<SettingsPatch, Vec<FieldError>> {
        let mut errors = Vec::new();
        let mut patch = SettingsPatch::new();
        for field in self.fields {
            match values.get(field.key).map(|value| value.trim()) {
                Some(value) if !value.is_empty() => patch = patch.text(field.key, value),
                _ => errors.push(FieldError::required(field.key, field.label)),
            }
        }
        if errors.is_empty() {
            Ok(patch.flag(self.flag, true))
        } else {
            Err(errors)
        }
    }

    /// Settings update that turns the integration off.
    pub fn disable_patch(&self) -> SettingsPatch {
        SettingsPatch::new().flag(self.flag, false)
    }
}

type MutationKey = (ProjectId, IntegrationId);

struct InFlightGuard<'a> {
    in_flight: &'a Mutex<HashSet<MutationKey>>,
    key: MutationKey,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

/// Connect/disconnect operations bound to one project's page session.
pub struct IntegrationMutations {
    api: Arc<dyn SettingsApi>,
    registry: IntegrationRegistry,
    resolver: Arc<FeatureLockResolver>,
    settings: SettingsStore,
    status: StatusContext,
    dashboards: Arc<DashboardTemplateScheduler>,
    oauth: OAuthConfig,
    in_flight: Mutex<HashSet<MutationKey>>,
}

impl std::fmt::Debug for IntegrationMutations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntegrationMutations")
            .field("project_id", &self.project_id())
            .finish_non_exhaustive()
    }
}

impl IntegrationMutations {
    /// Mutations sharing the page's settings, status and plan.
    pub fn new(
        api: Arc<dyn SettingsApi>,
        registry: IntegrationRegistry,
        resolver: Arc<FeatureLockResolver>,
        settings: SettingsStore,
        status: StatusContext,
        dashboards: Arc<DashboardTemplateScheduler>,
        oauth: OAuthConfig,
    ) -> Self {
        Self {
            api,
            registry,
            resolver,
            settings,
            status,
            dashboards,
            oauth,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Project the session is bound to.
    pub const fn project_id(&self) -> ProjectId {
        self.status.project_id()
    }

    /// Scheduler that creates default dashboards after a successful connect.
    pub const fn dashboards(&self) -> &Arc<DashboardTemplateScheduler> {
        &self.dashboards
    }

    /// Whether the connect/disconnect control for `integration` is disabled.
    pub fn is_in_flight(&self, integration: IntegrationId) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&(self.project_id(), integration))
    }

    fn begin(&self, integration: IntegrationId) -> Result<InFlightGuard<'_>, MutationError> {
        let key = (self.project_id(), integration);
        let inserted = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key);
        if inserted {
            Ok(InFlightGuard {
                in_flight: &self.in_flight,
                key,
            })
        } else {
            warn!(integration = %integration, "Ignoring mutation while another is in flight");
            Err(MutationError::InFlight { integration })
        }
    }

    /// Refuse integrations whose card would render locked.
    async fn ensure_unlocked(&self, descriptor: &IntegrationDescriptor) -> Result<(), MutationError> {
        let settings = match self.settings.current().await {
            SettingsState::Ready(settings) => settings,
            SettingsState::Loading | SettingsState::Failed(_) => ProjectSettings::default(),
        };
        let lock = self
            .resolver
            .resolve_descriptor(descriptor, &settings)
            .map_err(DomainError::from)?;
        if lock.blocks_access() {
            warn!(
                project_id = self.project_id(),
                integration = %descriptor.id,
                loading = lock.is_loading,
                "Refusing to connect an integration locked by the plan"
            );
            return Err(MutationError::Locked {
                integration: descriptor.id,
                name: descriptor.name,
            });
        }
        Ok(())
    }

    fn unsupported(descriptor: &IntegrationDescriptor, operation: &'static str) -> MutationError {
        MutationError::Domain(DomainError::UnsupportedOperation {
            integration: descriptor.name.to_string(),
            operation,
        })
    }

    /// Enable a credential or toggle integration with the submitted form values.
    pub async fn connect(
        &self,
        integration: IntegrationId,
        values: &FormValues,
    ) -> Result<Notification, MutationError> {
        let descriptor = self.registry.get(integration)?;
        let form = CredentialForm::for_integration(integration)
            .ok_or_else(|| Self::unsupported(descriptor, "connecting from a form"))?;
        self.ensure_unlocked(descriptor).await?;
        let patch = form.validate(values).map_err(DomainError::Validation)?;

        let _guard = self.begin(integration)?;
        let project_id = self.project_id();
        info!(
            project_id,
            integration = %integration,
            keys = ?patch.keys().collect::<Vec<_>>(),
            "Enabling integration"
        );
        if let Err(err) = self.api.update_project_settings(project_id, &patch).await {
            warn!(project_id, integration = %integration, error = %err, "Enable failed");
            return Err(err.into());
        }

        self.after_success().await;
        self.schedule_dashboards(project_id);
        Ok(Notification::Success(format!(
            "{} integration enabled!",
            descriptor.name
        )))
    }

    /// Turn an integration off.
    pub async fn disconnect(&self, integration: IntegrationId) -> Result<Notification, MutationError> {
        let descriptor = self.registry.get(integration)?;
        let project_id = self.project_id();

        match integration.form() {
            ProviderForm::SdkSnippet => return Err(Self::unsupported(descriptor, "disconnecting")),
            ProviderForm::OAuth { .. } => {
                let _guard = self.begin(integration)?;
                info!(project_id, integration = %integration, "Disconnecting integration");
                if let Err(err) = self.api.disable_integration(project_id, integration).await {
                    warn!(project_id, integration = %integration, error = %err, "Disconnect failed");
                    return Err(err.into());
                }
                self.after_success().await;
            }
            ProviderForm::Credentials { .. } | ProviderForm::Toggle { .. } => {
                let form = CredentialForm::for_integration(integration)
                    .ok_or_else(|| Self::unsupported(descriptor, "disconnecting"))?;
                let _guard = self.begin(integration)?;
                info!(project_id, integration = %integration, "Disconnecting integration");
                let patch = form.disable_patch();
                if let Err(err) = self.api.update_project_settings(project_id, &patch).await {
                    warn!(project_id, integration = %integration, error = %err, "Disconnect failed");
                    return Err(err.into());
                }
                self.after_success().await;
            }
        }

        Ok(Notification::Success(format!(
            "{} integration disconnected!",
            descriptor.name
        )))
    }

    /// Consent URL for an OAuth provider.
    pub async fn begin_oauth(
        &self,
        integration: IntegrationId,
        return_url: &str,
    ) -> Result<String, MutationError> {
        let descriptor = self.registry.get(integration)?;
        if matches!(integration.form(), ProviderForm::OAuth { .. }) {
            self.ensure_unlocked(descriptor).await?;
        }
        match integration.form() {
            ProviderForm::OAuth {
                flow: OAuthFlow::DirectConsent,
            } => direct_consent_url(integration, &self.oauth)
                .ok_or_else(|| Self::unsupported(descriptor, "OAuth without a configured client id")),
            ProviderForm::OAuth {
                flow: OAuthFlow::BackendRedirect,
            } => {
                let _guard = self.begin(integration)?;
                let url = self
                    .api
                    .begin_oauth(self.project_id(), integration, return_url)
                    .await?;
                info!(integration = %integration, "Redirecting to provider consent page");
                Ok(url)
            }
            ProviderForm::SdkSnippet | ProviderForm::Credentials { .. } | ProviderForm::Toggle { .. } => {
                Err(Self::unsupported(descriptor, "OAuth"))
            }
        }
    }

    async fn after_success(&self) {
        // Both stores log their own failures; the mutation itself succeeded.
        let (_settings, ()) = tokio::join!(self.settings.refetch(), self.status.refetch());
    }

    fn schedule_dashboards(&self, project_id: ProjectId) {
        let dashboards = Arc::clone(&self.dashboards);
        tokio::spawn(async move {
            let _ = dashboards.ensure_default_dashboards(project_id).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{DashboardConfig, FeatureEntitlement, PlanEntitlements};
    use crate::services::testing::FakeSettingsApi;

    fn values(pairs: &[(&str, &str)]) -> FormValues {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn entitled_to_everything() -> FeatureLockResolver {
        FeatureLockResolver::loaded(PlanEntitlements::new(
            "ENTERPRISE",
            IntegrationId::ALL
                .iter()
                .filter_map(|id| id.required_feature())
                .map(|feature| FeatureEntitlement::enabled(feature.as_str()))
                .collect(),
        ))
    }

    async fn mutations(api: Arc<FakeSettingsApi>) -> IntegrationMutations {
        mutations_with_plan(api, entitled_to_everything()).await
    }

    async fn mutations_with_plan(
        api: Arc<FakeSettingsApi>,
        resolver: FeatureLockResolver,
    ) -> IntegrationMutations {
        let dyn_api: Arc<dyn SettingsApi> = api;
        let settings = SettingsStore::new(Arc::clone(&dyn_api), 1);
        let status = StatusContext::new(Arc::clone(&dyn_api), 1);
        let dashboards = Arc::new(DashboardTemplateScheduler::new(
            Arc::clone(&dyn_api),
            &DashboardConfig {
                enabled: false,
                debounce_ms: 0,
            },
        ));
        IntegrationMutations::new(
            dyn_api,
            IntegrationRegistry::builtin(),
            Arc::new(resolver),
            settings,
            status,
            dashboards,
            OAuthConfig::default(),
        )
    }

    #[test]
    fn test_validate_reports_each_missing_field() {
        let form = CredentialForm::for_integration(IntegrationId::LeadSquared).unwrap();
        let errors = form
            .validate(&values(&[("int_leadsquared_access_key", "ak"), ("int_leadsquared_host", "  ")]))
            .unwrap_err();
        let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["Please enter Secret Key", "Please enter Host"]);
    }

    #[test]
    fn test_validate_builds_patch_with_flag() {
        let form = CredentialForm::for_integration(IntegrationId::G2).unwrap();
        let patch = form.validate(&values(&[("int_g2_api_key", " key ")])).unwrap();
        assert_eq!(patch.get("int_g2_api_key"), Some(&serde_json::json!("key")));
        assert_eq!(patch.get("int_g2"), Some(&serde_json::json!(true)));

        let toggle = CredentialForm::for_integration(IntegrationId::Drift).unwrap();
        let patch = toggle.validate(&FormValues::new()).unwrap();
        assert_eq!(patch.get("int_drift"), Some(&serde_json::json!(true)));
        assert!(CredentialForm::for_integration(IntegrationId::Hubspot).is_none());
    }

    #[tokio::test]
    async fn test_connect_refetches_once_each() {
        let api = Arc::new(FakeSettingsApi::default());
        let mutations = mutations(Arc::clone(&api)).await;

        let notification = mutations
            .connect(IntegrationId::G2, &values(&[("int_g2_api_key", "abc")]))
            .await
            .unwrap();
        assert_eq!(notification, Notification::Success("G2 integration enabled!".to_string()));
        assert_eq!(api.calls.update_settings(), 1);
        assert_eq!(api.calls.fetch_settings(), 1);
        assert_eq!(api.calls.fetch_status(), 1);
    }

    #[tokio::test]
    async fn test_invalid_form_issues_no_request() {
        let api = Arc::new(FakeSettingsApi::default());
        let mutations = mutations(Arc::clone(&api)).await;

        let err = mutations
            .connect(IntegrationId::ClearbitReveal, &FormValues::new())
            .await
            .unwrap_err();
        assert_eq!(err.field_errors().len(), 1);
        assert_eq!(api.calls.update_settings(), 0);
    }

    #[tokio::test]
    async fn test_failed_disconnect_does_not_refetch() {
        let api = Arc::new(FakeSettingsApi::default());
        api.fail_mutations(ApiError::Server {
            status: 500,
            message: "boom".to_string(),
        });
        let mutations = mutations(Arc::clone(&api)).await;

        let err = mutations.disconnect(IntegrationId::Hubspot).await.unwrap_err();
        assert_eq!(err.notification(), Notification::Error("boom".to_string()));
        assert_eq!(api.calls.disable(), 1);
        assert_eq!(api.calls.fetch_settings(), 0);
        assert_eq!(api.calls.fetch_status(), 0);
        assert!(!mutations.is_in_flight(IntegrationId::Hubspot));
    }

    #[tokio::test]
    async fn test_locked_integration_is_refused_without_request() {
        let api = Arc::new(FakeSettingsApi::default());
        let mutations = mutations_with_plan(
            Arc::clone(&api),
            FeatureLockResolver::loaded(PlanEntitlements::new("FREE", Vec::new())),
        )
        .await;

        let err = mutations
            .connect(IntegrationId::ClearbitReveal, &values(&[("clearbit_key", "key")]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MutationError::Locked {
                integration: IntegrationId::ClearbitReveal,
                ..
            }
        ));
        assert_eq!(
            err.notification(),
            Notification::Error("Clearbit Reveal is not available on your current plan".to_string())
        );

        let err = mutations
            .begin_oauth(IntegrationId::Salesforce, "/settings")
            .await
            .unwrap_err();
        assert!(matches!(err, MutationError::Locked { .. }));
        assert_eq!(api.calls.update_settings(), 0);
        assert_eq!(api.calls.begin_oauth(), 0);
        assert!(!mutations.is_in_flight(IntegrationId::Salesforce));
    }

    #[tokio::test]
    async fn test_unloaded_plan_refuses_connect() {
        let api = Arc::new(FakeSettingsApi::default());
        let mutations = mutations_with_plan(Arc::clone(&api), FeatureLockResolver::new()).await;

        let err = mutations
            .connect(IntegrationId::Drift, &FormValues::new())
            .await
            .unwrap_err();
        assert!(matches!(err, MutationError::Locked { .. }));
        assert_eq!(api.calls.update_settings(), 0);
    }

    #[tokio::test]
    async fn test_sdk_cannot_be_disconnected() {
        let api = Arc::new(FakeSettingsApi::default());
        let mutations = mutations(Arc::clone(&api)).await;
        let err = mutations.disconnect(IntegrationId::Sdk).await.unwrap_err();
        assert!(matches!(
            err,
            MutationError::Domain(DomainError::UnsupportedOperation { .. })
        ));
    }

    #[tokio::test]
    async fn test_begin_oauth_paths() {
        let api = Arc::new(FakeSettingsApi::default());
        let mutations = mutations(Arc::clone(&api)).await;

        let url = mutations
            .begin_oauth(IntegrationId::Hubspot, "http://localhost:3000/settings")
            .await
            .unwrap();
        assert!(url.contains("hubspot"));

        let err = mutations
            .begin_oauth(IntegrationId::LinkedIn, "http://localhost:3000/settings")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("LinkedIn"));

        assert!(mutations.begin_oauth(IntegrationId::G2, "/").await.is_err());
    }
}
