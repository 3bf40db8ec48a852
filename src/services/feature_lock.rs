//! Plan-based feature locking.
//!
//! Lock state is a pure function of the last plan fetch outcome and the
//! provider's own "connected" settings flag. Until the plan has loaded, and
//! after it fails to load, every gated feature reads as locked.

use chrono::Utc;
use tracing::{debug, warn};

use crate::domain::errors::ApiError;
use crate::domain::models::{
    Feature, FeatureLockState, IntegrationDescriptor, PlanEntitlements, ProjectSettings,
    SettingsError,
};

/// Outcome of the plan entitlement fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EntitlementState {
    /// Fetch not settled yet
    #[default]
    Loading,
    /// Plan available
    Loaded(PlanEntitlements),
    /// Fetch failed with this message
    Failed(String),
}

/// Resolves [`FeatureLockState`] for plan-gated integrations.
#[derive(Debug, Clone, Default)]
pub struct FeatureLockResolver {
    state: EntitlementState,
}

impl FeatureLockResolver {
    /// Resolver still waiting for the plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver with entitlements already available.
    pub fn loaded(plan: PlanEntitlements) -> Self {
        Self {
            state: EntitlementState::Loaded(plan),
        }
    }

    /// Record the outcome of a plan fetch.
    pub fn load(&mut self, result: Result<PlanEntitlements, ApiError>) {
        self.state = match result {
            Ok(plan) => {
                debug!(
                    plan = %plan.plan_name,
                    features = plan.features.len(),
                    "Plan entitlements loaded"
                );
                EntitlementState::Loaded(plan)
            }
            Err(err) => {
                warn!(error = %err, "Failed to load plan entitlements, locking gated integrations");
                EntitlementState::Failed(err.to_string())
            }
        };
    }

    /// Current fetch outcome.
    pub const fn state(&self) -> &EntitlementState {
        &self.state
    }

    /// Whether the plan fetch is still pending.
    pub const fn is_loading(&self) -> bool {
        matches!(self.state, EntitlementState::Loading)
    }

    /// Lock state for `feature`, given whether the provider is already connected.
    pub fn resolve(&self, feature: Feature, connected: bool) -> FeatureLockState {
        self.resolve_at(feature, connected, Utc::now().timestamp())
    }

    /// Same as [`resolve`](Self::resolve), judging entitlement expiry at unix time `now`.
    pub fn resolve_at(&self, feature: Feature, connected: bool, now: i64) -> FeatureLockState {
        let feature_name = feature.as_str();
        match &self.state {
            EntitlementState::Loading => FeatureLockState {
                feature_name: feature_name.to_string(),
                is_feature_locked: true,
                is_feature_connected: connected,
                is_loading: true,
                usage: None,
                limit: None,
            },
            EntitlementState::Failed(_) => FeatureLockState {
                feature_name: feature_name.to_string(),
                is_feature_locked: true,
                is_feature_connected: connected,
                is_loading: false,
                usage: None,
                limit: None,
            },
            EntitlementState::Loaded(plan) => {
                let entitlement = plan.entitlement(feature_name);
                let limit = entitlement
                    .map(|entitlement| entitlement.limit)
                    .filter(|limit| *limit > 0);
                FeatureLockState {
                    feature_name: feature_name.to_string(),
                    is_feature_locked: !plan.is_entitled_at(feature_name, now),
                    is_feature_connected: connected,
                    is_loading: false,
                    usage: limit.and(plan.usage_of(feature_name)),
                    limit,
                }
            }
        }
    }

    /// Lock state for a catalog entry, reading its connection from `settings`.
    ///
    /// Entries with no required feature are never locked.
    pub fn resolve_descriptor(
        &self,
        descriptor: &IntegrationDescriptor,
        settings: &ProjectSettings,
    ) -> Result<FeatureLockState, SettingsError> {
        let connected = settings.connection(descriptor.id)?.connected;
        Ok(match descriptor.required_feature() {
            Some(feature) => self.resolve(feature, connected),
            None => FeatureLockState::ungated(descriptor.status_key(), connected),
        })
    }
}
