//! Plan entitlements and the lock state derived from them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One feature row of the project's plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureEntitlement {
    /// Feature name, e.g. `int_hubspot`
    pub name: String,

    /// Whether the plan turns the feature on
    #[serde(default)]
    pub is_enabled_feature: bool,

    /// Usage cap; 0 means the feature carries no limit
    #[serde(default)]
    pub limit: i64,

    /// Unix timestamp after which the entitlement lapses; 0 means none
    #[serde(default)]
    pub expiry: i64,
}

impl FeatureEntitlement {
    /// Enabled row with no limit and no expiry.
    pub fn enabled(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_enabled_feature: true,
            limit: 0,
            expiry: 0,
        }
    }

    /// Row present in the plan but switched off.
    pub fn disabled(name: impl Into<String>) -> Self {
        Self {
            is_enabled_feature: false,
            ..Self::enabled(name)
        }
    }

    /// Whether the expiry has passed at unix time `now`.
    pub const fn is_expired_at(&self, now: i64) -> bool {
        self.expiry > 0 && now >= self.expiry
    }

    /// Enabled and not expired at unix time `now`.
    pub const fn is_active_at(&self, now: i64) -> bool {
        self.is_enabled_feature && !self.is_expired_at(now)
    }
}

/// Plan payload from `GET /projects/{id}/v1/settings`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntitlements {
    /// Display name of the plan
    #[serde(default)]
    pub plan_name: String,

    /// Feature rows
    #[serde(default, alias = "feature_list")]
    pub features: Vec<FeatureEntitlement>,

    /// Current usage per feature name
    #[serde(default)]
    pub usage: HashMap<String, u64>,
}

impl PlanEntitlements {
    /// Plan with no recorded usage.
    pub fn new(plan_name: impl Into<String>, features: Vec<FeatureEntitlement>) -> Self {
        Self {
            plan_name: plan_name.into(),
            features,
            usage: HashMap::new(),
        }
    }

    /// Case-insensitive lookup by feature name.
    pub fn entitlement(&self, feature_name: &str) -> Option<&FeatureEntitlement> {
        self.features
            .iter()
            .find(|entitlement| entitlement.name.eq_ignore_ascii_case(feature_name))
    }

    /// Present and not explicitly disabled, ignoring expiry.
    pub fn is_entitled(&self, feature_name: &str) -> bool {
        self.entitlement(feature_name)
            .is_some_and(|entitlement| entitlement.is_enabled_feature)
    }

    /// Present, enabled and not expired at unix time `now`.
    pub fn is_entitled_at(&self, feature_name: &str, now: i64) -> bool {
        self.entitlement(feature_name)
            .is_some_and(|entitlement| entitlement.is_active_at(now))
    }

    /// Recorded usage for a feature, matched case-insensitively.
    pub fn usage_of(&self, feature_name: &str) -> Option<u64> {
        self.usage
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(feature_name))
            .map(|(_, used)| *used)
    }
}

/// Resolved lock state for one feature. Lives for a single render pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureLockState {
    /// Plan feature name
    pub feature_name: String,
    /// The plan does not grant the feature
    pub is_feature_locked: bool,
    /// The provider is already connected for this project
    pub is_feature_connected: bool,
    /// The plan has not loaded yet
    pub is_loading: bool,
    /// Current usage, only for limited features
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<u64>,
    /// Usage cap, only for limited features
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

impl FeatureLockState {
    /// State for something that is not plan-gated at all.
    pub fn ungated(feature_name: impl Into<String>, connected: bool) -> Self {
        Self {
            feature_name: feature_name.into(),
            is_feature_locked: false,
            is_feature_connected: connected,
            is_loading: false,
            usage: None,
            limit: None,
        }
    }

    /// Locked and not grandfathered in by an existing connection.
    pub const fn blocks_access(&self) -> bool {
        self.is_feature_locked && !self.is_feature_connected
    }
}
