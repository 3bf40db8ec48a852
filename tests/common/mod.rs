//! Common test utilities for integration tests
//!
//! Provides an in-memory backend and fixtures shared across the scenario
//! tests.

#![allow(dead_code)]

use async_trait::async_trait;
use integration_settings::domain::errors::ApiError;
use integration_settings::domain::models::{
    Config, FeatureEntitlement, IntegrationId, PlanEntitlements, ProjectSettings, SettingsPatch,
};
use integration_settings::domain::ports::{ApiResult, ProjectId, SettingsApi, StatusMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Call counters, one per backend endpoint.
#[derive(Debug, Default)]
pub struct Calls {
    pub fetch_settings: AtomicUsize,
    pub update_settings: AtomicUsize,
    pub fetch_plan: AtomicUsize,
    pub fetch_status: AtomicUsize,
    pub disable: AtomicUsize,
    pub begin_oauth: AtomicUsize,
    pub dashboards: AtomicUsize,
}

impl Calls {
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

/// In-memory backend. Plan and status fail with a transport error until set.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    pub calls: Calls,
    settings: Mutex<ProjectSettings>,
    plan: Mutex<Option<PlanEntitlements>>,
    status: Mutex<Option<StatusMap>>,
    fail_settings: Mutex<bool>,
    latency: Mutex<Duration>,
}

impl InMemoryBackend {
    pub fn new(settings: serde_json::Value) -> Self {
        let backend = Self::default();
        *backend.settings.lock().unwrap() = ProjectSettings::from(settings);
        backend
    }

    pub fn with_plan(self, plan: PlanEntitlements) -> Self {
        *self.plan.lock().unwrap() = Some(plan);
        self
    }

    pub fn with_status(self, status: StatusMap) -> Self {
        *self.status.lock().unwrap() = Some(status);
        self
    }

    pub fn with_latency(self, latency: Duration) -> Self {
        *self.latency.lock().unwrap() = latency;
        self
    }

    pub fn fail_settings_fetch(&self, fail: bool) {
        *self.fail_settings.lock().unwrap() = fail;
    }

    pub fn settings(&self) -> ProjectSettings {
        self.settings.lock().unwrap().clone()
    }

    async fn pause(&self) {
        let latency = *self.latency.lock().unwrap();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl SettingsApi for InMemoryBackend {
    async fn fetch_project_settings(&self, _project_id: ProjectId) -> ApiResult<ProjectSettings> {
        self.calls.fetch_settings.fetch_add(1, Ordering::SeqCst);
        if *self.fail_settings.lock().unwrap() {
            return Err(ApiError::Server {
                status: 500,
                message: "settings unavailable".to_string(),
            });
        }
        Ok(self.settings())
    }

    async fn update_project_settings(
        &self,
        _project_id: ProjectId,
        patch: &SettingsPatch,
    ) -> ApiResult<ProjectSettings> {
        self.calls.update_settings.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        let mut settings = self.settings.lock().unwrap();
        settings.apply(patch);
        Ok(settings.clone())
    }

    async fn fetch_plan_entitlements(&self, _project_id: ProjectId) -> ApiResult<PlanEntitlements> {
        self.calls.fetch_plan.fetch_add(1, Ordering::SeqCst);
        self.plan
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ApiError::Transport("connection refused".to_string()))
    }

    async fn fetch_integration_status(&self, _project_id: ProjectId) -> ApiResult<StatusMap> {
        self.calls.fetch_status.fetch_add(1, Ordering::SeqCst);
        self.status
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ApiError::Transport("connection refused".to_string()))
    }

    async fn disable_integration(
        &self,
        _project_id: ProjectId,
        _integration: IntegrationId,
    ) -> ApiResult<()> {
        self.calls.disable.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        Ok(())
    }

    async fn begin_oauth(
        &self,
        _project_id: ProjectId,
        integration: IntegrationId,
        _return_url: &str,
    ) -> ApiResult<String> {
        self.calls.begin_oauth.fetch_add(1, Ordering::SeqCst);
        Ok(format!("https://consent.example.com/{integration}"))
    }

    async fn create_default_dashboards(&self, _project_id: ProjectId) -> ApiResult<()> {
        self.calls.dashboards.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Plan that enables every listed feature.
pub fn plan(features: &[&str]) -> PlanEntitlements {
    PlanEntitlements::new(
        "GROWTH",
        features
            .iter()
            .map(|name| FeatureEntitlement::enabled(*name))
            .collect(),
    )
}

/// Default config with a short dashboard debounce.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.dashboards.debounce_ms = 10;
    config
}
