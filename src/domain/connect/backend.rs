//! Usage: Backend command boundary consumed by the connect coordinator.

use crate::domain::auth_status::AuthStatus;
use crate::domain::providers::Provider;
use crate::shared::error::AppResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Authorization URL plus the opaque correlation token used to poll for completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationUrl {
    pub url: String,
    pub state: String,
}

/// The command surface the coordinator drives. The production implementation
/// talks to the proxy sidecar's management API; tests script a fake.
#[async_trait]
pub trait ConnectBackend: Send + Sync + 'static {
    /// Requests a provider authorization URL and correlation token.
    async fn authorization_url(&self, provider: Provider) -> AppResult<AuthorizationUrl>;

    /// Opens `url` in the host's default browser.
    async fn open_external(&self, url: &str) -> AppResult<()>;

    /// Checks whether the authorization correlated by `state` has completed.
    /// Idempotent; may be called repeatedly.
    async fn poll_completion(&self, state: &str) -> AppResult<bool>;

    /// Fetches the authoritative per-provider account counts.
    async fn fetch_auth_status(&self) -> AppResult<AuthStatus>;

    /// Removes every credential linked for `provider`.
    async fn disconnect_provider(&self, provider: Provider) -> AppResult<()>;

    /// Imports a local credential file (file-based providers only).
    async fn import_credential_file(&self, path: &Path) -> AppResult<()>;
}
