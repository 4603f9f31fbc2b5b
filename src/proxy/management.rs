//! Usage: HTTP bridge to the proxy sidecar's management API; implements the
//! backend boundary the connect coordinator drives.

use crate::domain::auth_status::AuthStatus;
use crate::domain::connect::backend::{AuthorizationUrl, ConnectBackend};
use crate::domain::providers::Provider;
use crate::infra::browser;
use crate::proxy::ProxyManager;
use crate::shared::error::{AppError, AppResult};
use crate::shared::mutex_ext::MutexExt;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const MANAGEMENT_PREFIX: &str = "/v0/management";
const HEALTH_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    completed: bool,
}

pub struct ManagementBridge {
    client: reqwest::Client,
    manager: Arc<Mutex<ProxyManager>>,
}

impl ManagementBridge {
    pub fn new(manager: Arc<Mutex<ProxyManager>>) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!("proxypal-management/{}", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                AppError::new("SYSTEM_ERROR", format!("management client init failed: {e}"))
            })?;
        Ok(Self { client, manager })
    }

    fn management_url(&self, path: &str) -> AppResult<String> {
        let base = self.manager.lock_or_recover().management_base_url()?;
        Ok(format!("{base}{MANAGEMENT_PREFIX}{path}"))
    }

    /// Best-effort readiness probe used right after the sidecar starts.
    pub async fn probe_health(&self) -> AppResult<bool> {
        let base = self.manager.lock_or_recover().management_base_url()?;
        match self
            .client
            .get(format!("{base}/health"))
            .timeout(HEALTH_PROBE_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => Ok(response.status().is_success()),
            Err(err) => {
                tracing::debug!("health probe failed: {err}");
                Ok(false)
            }
        }
    }

    fn expect_success(response: &reqwest::Response, what: &str) -> AppResult<()> {
        if !response.status().is_success() {
            return Err(AppError::new(
                "SYSTEM_ERROR",
                format!("{what} failed with status {}", response.status()),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ConnectBackend for ManagementBridge {
    async fn authorization_url(&self, provider: Provider) -> AppResult<AuthorizationUrl> {
        let url = self.management_url("/oauth/url")?;
        let response = self
            .client
            .get(url)
            .query(&[("provider", provider.as_str())])
            .send()
            .await
            .map_err(|e| {
                AppError::new(
                    "SYSTEM_ERROR",
                    format!("authorization url request failed: {e}"),
                )
            })?;
        Self::expect_success(&response, "authorization url request")?;
        response.json::<AuthorizationUrl>().await.map_err(|e| {
            AppError::new("SYSTEM_ERROR", format!("authorization url parse failed: {e}"))
        })
    }

    async fn open_external(&self, url: &str) -> AppResult<()> {
        browser::open_browser(url)
    }

    async fn poll_completion(&self, state: &str) -> AppResult<bool> {
        let url = self.management_url("/oauth/status")?;
        let response = self
            .client
            .get(url)
            .query(&[("state", state)])
            .send()
            .await
            .map_err(|e| AppError::new("SYSTEM_ERROR", format!("completion check failed: {e}")))?;
        Self::expect_success(&response, "completion check")?;
        let payload = response.json::<CompletionResponse>().await.map_err(|e| {
            AppError::new("SYSTEM_ERROR", format!("completion check parse failed: {e}"))
        })?;
        Ok(payload.completed)
    }

    async fn fetch_auth_status(&self) -> AppResult<AuthStatus> {
        let url = self.management_url("/auth/status")?;
        let response = self.client.get(url).send().await.map_err(|e| {
            AppError::new("SYSTEM_ERROR", format!("auth status request failed: {e}"))
        })?;
        Self::expect_success(&response, "auth status request")?;
        response
            .json::<AuthStatus>()
            .await
            .map_err(|e| AppError::new("SYSTEM_ERROR", format!("auth status parse failed: {e}")))
    }

    async fn disconnect_provider(&self, provider: Provider) -> AppResult<()> {
        let url = self.management_url(&format!("/auth/{}", provider.as_str()))?;
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|e| AppError::new("SYSTEM_ERROR", format!("disconnect request failed: {e}")))?;
        Self::expect_success(&response, "disconnect request")
    }

    async fn import_credential_file(&self, path: &Path) -> AppResult<()> {
        let url = self.management_url("/auth/import")?;
        let response = self
            .client
            .post(url)
            .json(&serde_json::json!({ "path": path }))
            .send()
            .await
            .map_err(|e| {
                AppError::new("SYSTEM_ERROR", format!("credential import request failed: {e}"))
            })?;
        Self::expect_success(&response, "credential import request")
    }
}
