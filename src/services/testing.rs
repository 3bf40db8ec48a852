//! In-memory `SettingsApi` for unit tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::domain::errors::ApiError;
use crate::domain::models::{
    IntegrationId, PlanEntitlements, ProjectSettings, SettingsPatch,
};
use crate::domain::ports::{ApiResult, ProjectId, SettingsApi, StatusMap};

#[derive(Debug, Default)]
pub struct CallCounts {
    fetch_settings: AtomicUsize,
    update_settings: AtomicUsize,
    fetch_plan: AtomicUsize,
    fetch_status: AtomicUsize,
    disable: AtomicUsize,
    begin_oauth: AtomicUsize,
    dashboards: AtomicUsize,
}

impl CallCounts {
    pub fn fetch_settings(&self) -> usize {
        self.fetch_settings.load(Ordering::SeqCst)
    }
    pub fn update_settings(&self) -> usize {
        self.update_settings.load(Ordering::SeqCst)
    }
    pub fn fetch_plan(&self) -> usize {
        self.fetch_plan.load(Ordering::SeqCst)
    }
    pub fn fetch_status(&self) -> usize {
        self.fetch_status.load(Ordering::SeqCst)
    }
    pub fn disable(&self) -> usize {
        self.disable.load(Ordering::SeqCst)
    }
    pub fn begin_oauth(&self) -> usize {
        self.begin_oauth.load(Ordering::SeqCst)
    }
    pub fn dashboards(&self) -> usize {
        self.dashboards.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Default)]
pub struct FakeSettingsApi {
    pub calls: CallCounts,
    settings: Mutex<ProjectSettings>,
    plan: Mutex<Option<PlanEntitlements>>,
    status: Mutex<Option<StatusMap>>,
    mutation_error: Mutex<Option<ApiError>>,
    latency: Mutex<Duration>,
    read_delays: Mutex<VecDeque<Duration>>,
}

impl FakeSettingsApi {
    pub fn with_settings(settings: ProjectSettings) -> Self {
        let api = Self::default();
        *api.settings.lock().unwrap() = settings;
        api
    }

    pub fn set_plan(&self, plan: PlanEntitlements) {
        *self.plan.lock().unwrap() = Some(plan);
    }

    pub fn set_status(&self, status: StatusMap) {
        *self.status.lock().unwrap() = Some(status);
    }

    pub fn fail_mutations(&self, err: ApiError) {
        *self.mutation_error.lock().unwrap() = Some(err);
    }

    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = latency;
    }

    /// Delay the next settings or status reads, one entry per call in order.
    /// Each read answers with the data as it was when the call started.
    pub fn script_read_delays(&self, delays: impl IntoIterator<Item = Duration>) {
        self.read_delays.lock().unwrap().extend(delays);
    }

    async fn read_delay(&self) {
        let delay = self.read_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay.filter(|delay| !delay.is_zero()) {
            tokio::time::sleep(delay).await;
        }
    }

    async fn pause(&self) {
        let latency = *self.latency.lock().unwrap();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }

    fn mutation_result(&self) -> ApiResult<()> {
        self.mutation_error.lock().unwrap().clone().map_or(Ok(()), Err)
    }
}

#[async_trait]
impl SettingsApi for FakeSettingsApi {
    async fn fetch_project_settings(&self, _project_id: ProjectId) -> ApiResult<ProjectSettings> {
        self.calls.fetch_settings.fetch_add(1, Ordering::SeqCst);
        let settings = self.settings.lock().unwrap().clone();
        self.read_delay().await;
        Ok(settings)
    }

    async fn update_project_settings(
        &self,
        _project_id: ProjectId,
        patch: &SettingsPatch,
    ) -> ApiResult<ProjectSettings> {
        self.calls.update_settings.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.mutation_result()?;
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
            .ok_or_else(|| ApiError::Transport("plan unavailable".to_string()))
    }

    async fn fetch_integration_status(&self, _project_id: ProjectId) -> ApiResult<StatusMap> {
        self.calls.fetch_status.fetch_add(1, Ordering::SeqCst);
        let status = self.status.lock().unwrap().clone();
        self.read_delay().await;
        status.ok_or_else(|| ApiError::Transport("status unavailable".to_string()))
    }

    async fn disable_integration(
        &self,
        _project_id: ProjectId,
        _integration: IntegrationId,
    ) -> ApiResult<()> {
        self.calls.disable.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.mutation_result()
    }

    async fn begin_oauth(
        &self,
        _project_id: ProjectId,
        integration: IntegrationId,
        return_url: &str,
    ) -> ApiResult<String> {
        self.calls.begin_oauth.fetch_add(1, Ordering::SeqCst);
        Ok(format!("https://auth.example.com/{integration}?return={return_url}"))
    }

    async fn create_default_dashboards(&self, _project_id: ProjectId) -> ApiResult<()> {
        self.calls.dashboards.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        Ok(())
    }
}
