//! reqwest implementation of [`SettingsApi`](crate::domain::ports::SettingsApi).

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::domain::errors::ApiError;
use crate::domain::models::config::ApiConfig;
use crate::domain::models::{IntegrationId, PlanEntitlements, ProjectSettings, SettingsPatch};
use crate::domain::ports::{ApiResult, ProjectId, SettingsApi, StatusMap};
use crate::infrastructure::logging::SecretScrubber;

#[derive(Debug, Serialize)]
struct OAuthRequest<'a> {
    project_id: String,
    return_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct OAuthResponse {
    redirect_url: String,
}

/// reqwest-backed [`SettingsApi`]
///
/// One request per call, no retries. Non-2xx responses are classified by
/// [`ApiError::from_status`].
pub struct HttpSettingsApi {
    http_client: ReqwestClient,
    base_url: String,
    api_token: Option<String>,
    scrubber: SecretScrubber,
}

impl std::fmt::Debug for HttpSettingsApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSettingsApi")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.api_token.is_some())
            .finish()
    }
}

impl HttpSettingsApi {
    /// Build a client from the `api` config section.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(4)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config
                .api_token
                .clone()
                .filter(|token| !token.trim().is_empty()),
            scrubber: SecretScrubber::new().context("Failed to compile secret scrubber")?,
        })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http_client
            .request(method, format!("{}{}", self.base_url, path));
        match self.api_token {
            Some(ref token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let response = builder.send().await.map_err(|err| {
            if err.is_timeout() {
                ApiError::Transport("Request timed out".to_string())
            } else {
                ApiError::Transport(err.without_url().to_string())
            }
        })?;

        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url().path(), "Backend responded");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status.as_u16(), &body))
    }

    async fn json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|err| ApiError::InvalidResponse(err.without_url().to_string()))
    }
}

#[async_trait]
impl SettingsApi for HttpSettingsApi {
    #[instrument(skip(self))]
    async fn fetch_project_settings(&self, project_id: ProjectId) -> ApiResult<ProjectSettings> {
        let response = self
            .send(self.request(Method::GET, &format!("/projects/{project_id}/settings")))
            .await?;
        Self::json(response).await
    }

    #[instrument(skip(self, patch))]
    async fn update_project_settings(
        &self,
        project_id: ProjectId,
        patch: &SettingsPatch,
    ) -> ApiResult<ProjectSettings> {
        if let Ok(body) = serde_json::to_string(patch) {
            debug!(body = %self.scrubber.scrub(&body), "Updating project settings");
        }
        let response = self
            .send(
                self.request(Method::PUT, &format!("/projects/{project_id}/settings"))
                    .json(patch),
            )
            .await?;
        Self::json(response).await
    }

    #[instrument(skip(self))]
    async fn fetch_plan_entitlements(&self, project_id: ProjectId) -> ApiResult<PlanEntitlements> {
        let response = self
            .send(self.request(Method::GET, &format!("/projects/{project_id}/v1/settings")))
            .await?;
        Self::json(response).await
    }

    #[instrument(skip(self))]
    async fn fetch_integration_status(&self, project_id: ProjectId) -> ApiResult<StatusMap> {
        let response = self
            .send(self.request(
                Method::GET,
                &format!("/projects/{project_id}/v1/integrations/status"),
            ))
            .await?;
        Self::json(response).await
    }

    #[instrument(skip(self))]
    async fn disable_integration(
        &self,
        project_id: ProjectId,
        integration: IntegrationId,
    ) -> ApiResult<()> {
        self.send(self.request(
            Method::DELETE,
            &format!("/projects/{project_id}/integrations/{integration}"),
        ))
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn begin_oauth(
        &self,
        project_id: ProjectId,
        integration: IntegrationId,
        return_url: &str,
    ) -> ApiResult<String> {
        let request = self
            .request(Method::POST, &format!("/integrations/{integration}/auth"))
            .json(&OAuthRequest {
                project_id: project_id.to_string(),
                return_url,
            });
        let response = request.send().await.map_err(|err| {
            ApiError::Transport(err.without_url().to_string())
        })?;

        // The backend answers with 307 and the consent URL in the body.
        let status = response.status();
        if !(status.is_success() || status == StatusCode::TEMPORARY_REDIRECT) {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status.as_u16(), &body));
        }
        let OAuthResponse { redirect_url } = Self::json(response).await?;
        if redirect_url.trim().is_empty() {
            return Err(ApiError::InvalidResponse("empty redirect_url".to_string()));
        }
        Ok(redirect_url)
    }

    #[instrument(skip(self))]
    async fn create_default_dashboards(&self, project_id: ProjectId) -> ApiResult<()> {
        self.send(
            self.request(
                Method::POST,
                &format!("/projects/{project_id}/v1/dashboard_templates/defaults"),
            )
            .json(&serde_json::json!({})),
        )
        .await?;
        Ok(())
    }
}
