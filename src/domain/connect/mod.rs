//! Usage: OAuth connection coordinator: authorization-URL acquisition, external
//! authorization, completion polling, and auth-status reconciliation.
//!
//! Contract:
//! - At most one connection attempt is active at a time.
//! - Completion polling fires once per interval, up to a fixed attempt ceiling;
//!   individual poll failures are tolerated, only the ceiling is a hard stop.
//! - After completion the account counts are re-fetched with a bounded retry to
//!   absorb the backend's write-to-read lag, then committed wholesale.
//! - Cancellation aborts the polling task immediately; an in-flight check from
//!   the cancelled iteration is dropped on the floor.

pub(crate) mod backend;


use crate::domain::auth_status::AuthStatus;
use crate::domain::providers::{ConnectionKind, Provider};
use crate::proxy::ProxyStatus;
use crate::shared::error::{AppError, AppResult};
use crate::shared::mutex_ext::MutexExt;
use crate::shared::retry::{retry_until, RetryPolicy};
use backend::ConnectBackend;
use serde::Serialize;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_secs(1);
const MAX_POLL_ATTEMPTS: u32 = 120;
const SETTLE_DELAY: Duration = Duration::from_millis(500);
const REFRESH_RETRIES: u32 = 3;
const REFRESH_RETRY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy)]
pub struct ConnectConfig {
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
    pub settle_delay: Duration,
    pub refresh_retries: u32,
    pub refresh_retry_delay: Duration,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            poll_interval: POLL_INTERVAL,
            max_poll_attempts: MAX_POLL_ATTEMPTS,
            settle_delay: SETTLE_DELAY,
            refresh_retries: REFRESH_RETRIES,
            refresh_retry_delay: REFRESH_RETRY_DELAY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectPhase {
    /// URL issued, waiting for the user to open the browser.
    AwaitingUser,
    /// Interval polling for completion.
    Polling,
    /// Completion detected, reconciling account counts.
    Completing,
}

/// What the UI sees of the active attempt.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub provider: Provider,
    pub url: String,
    pub loading: bool,
}

/// Progress notifications delivered to the UI event sink.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ConnectEvent {
    BrowserOpened {
        provider: Provider,
    },
    Connected {
        provider: Provider,
        accounts: u32,
        confirmed: bool,
    },
    Timeout {
        provider: Provider,
    },
    Failed {
        provider: Provider,
        message: String,
    },
}

/// Outcome of the on-demand "I've already authorized" check.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum AlreadyAuthorized {
    Connected { accounts: u32, confirmed: bool },
    NotYet,
}

struct ActiveAttempt {
    id: u64,
    provider: Provider,
    url: String,
    token: String,
    phase: ConnectPhase,
    poll_task: Option<tokio::task::AbortHandle>,
}

#[derive(Default)]
struct Attempts {
    next_id: u64,
    current: Option<ActiveAttempt>,
}

pub struct ConnectCoordinator<B> {
    backend: Arc<B>,
    cfg: ConnectConfig,
    attempts: Mutex<Attempts>,
    auth: Mutex<AuthStatus>,
}

impl<B: ConnectBackend> ConnectCoordinator<B> {
    pub fn new(backend: Arc<B>, cfg: ConnectConfig) -> Self {
        Self {
            backend,
            cfg,
            attempts: Mutex::new(Attempts::default()),
            auth: Mutex::new(AuthStatus::default()),
        }
    }

    /// Most recent committed account counts.
    pub fn auth_snapshot(&self) -> AuthStatus {
        self.auth.lock_or_recover().clone()
    }

    /// The active attempt as seen by the UI, if any.
    pub fn session(&self) -> Option<SessionSnapshot> {
        let attempts = self.attempts.lock_or_recover();
        attempts.current.as_ref().map(|attempt| SessionSnapshot {
            provider: attempt.provider,
            url: attempt.url.clone(),
            loading: attempt.phase != ConnectPhase::AwaitingUser,
        })
    }

    /// Starts a connection attempt: requests an authorization URL and holds the
    /// session until the flow completes, times out, or is cancelled.
    pub async fn begin(&self, provider: Provider, proxy: &ProxyStatus) -> AppResult<SessionSnapshot> {
        if !proxy.running {
            return Err(AppError::new(
                "PROXY_NOT_RUNNING",
                "the proxy must be running to connect accounts",
            ));
        }
        if provider.connection_kind() != ConnectionKind::OAuth {
            return Err(AppError::new(
                "SEC_INVALID_INPUT",
                format!(
                    "{} accounts are linked by credential import, not OAuth",
                    provider.display_name()
                ),
            ));
        }
        if self.attempts.lock_or_recover().current.is_some() {
            return Err(AppError::new(
                "CONNECT_BUSY",
                "another connection attempt is already in progress",
            ));
        }

        let grant = self.backend.authorization_url(provider).await?;

        let mut attempts = self.attempts.lock_or_recover();
        if attempts.current.is_some() {
            return Err(AppError::new(
                "CONNECT_BUSY",
                "another connection attempt is already in progress",
            ));
        }
        attempts.next_id += 1;
        attempts.current = Some(ActiveAttempt {
            id: attempts.next_id,
            provider,
            url: grant.url.clone(),
            token: grant.state,
            phase: ConnectPhase::AwaitingUser,
            poll_task: None,
        });
        tracing::info!(provider = provider.as_str(), "authorization url issued");

        Ok(SessionSnapshot {
            provider,
            url: grant.url,
            loading: false,
        })
    }

    /// Opens the stored authorization URL externally and starts the completion
    /// polling loop. Terminal outcomes are delivered through `notify`.
    pub async fn start_authorization<F>(self: &Arc<Self>, notify: F) -> AppResult<()>
    where
        F: Fn(ConnectEvent) + Send + Sync + 'static,
    {
        let (id, provider, url, token) = {
            let attempts = self.attempts.lock_or_recover();
            let attempt = attempts
                .current
                .as_ref()
                .ok_or_else(|| AppError::new("CONNECT_IDLE", "no pending connection attempt"))?;
            if attempt.phase != ConnectPhase::AwaitingUser {
                return Err(AppError::new(
                    "CONNECT_BUSY",
                    "authorization is already in progress",
                ));
            }
            (
                attempt.id,
                attempt.provider,
                attempt.url.clone(),
                attempt.token.clone(),
            )
        };

        if let Err(err) = self.backend.open_external(&url).await {
            self.clear_attempt(id);
            return Err(err);
        }

        {
            let mut attempts = self.attempts.lock_or_recover();
            match attempts.current.as_mut() {
                Some(attempt) if attempt.id == id => attempt.phase = ConnectPhase::Polling,
                // Cancelled while the browser was opening; nothing to poll for.
                _ => return Ok(()),
            }
        }
        notify(ConnectEvent::BrowserOpened { provider });

        let coordinator = Arc::clone(self);
        let handle = tokio::spawn(async move {
            coordinator.run_poll_loop(id, provider, token, notify).await;
        });

        let mut attempts = self.attempts.lock_or_recover();
        match attempts.current.as_mut() {
            Some(attempt) if attempt.id == id => {
                attempt.poll_task = Some(handle.abort_handle());
            }
            _ => handle.abort(),
        }
        Ok(())
    }

    async fn run_poll_loop<F>(
        self: Arc<Self>,
        id: u64,
        provider: Provider,
        token: String,
        notify: F,
    ) where
        F: Fn(ConnectEvent) + Send + Sync + 'static,
    {
        let mut interval = tokio::time::interval(self.cfg.poll_interval);
        // First tick completes immediately; skip it so the first check lands one
        // full interval after the browser opened.
        interval.tick().await;

        let mut attempts_made = 0u32;
        let completed = loop {
            interval.tick().await;
            if !self.is_current(id) {
                return;
            }
            attempts_made += 1;
            match self.backend.poll_completion(&token).await {
                Ok(true) => break true,
                Ok(false) => {}
                Err(err) => {
                    tracing::warn!(
                        provider = provider.as_str(),
                        attempt = attempts_made,
                        "authorization poll failed: {err}"
                    );
                }
            }
            if attempts_made >= self.cfg.max_poll_attempts {
                break false;
            }
        };

        if !completed {
            if self.clear_attempt(id) {
                tracing::warn!(
                    provider = provider.as_str(),
                    attempts = attempts_made,
                    "authorization polling reached the attempt ceiling"
                );
                notify(ConnectEvent::Timeout { provider });
            }
            return;
        }

        if !self.enter_completing(id) {
            return;
        }
        match self.reconcile_after_completion(provider).await {
            Ok((auth, confirmed)) => {
                self.clear_attempt(id);
                notify(ConnectEvent::Connected {
                    provider,
                    accounts: auth.count_for(provider),
                    confirmed,
                });
            }
            Err(err) => {
                self.clear_attempt(id);
                tracing::error!(
                    provider = provider.as_str(),
                    "auth status reconciliation failed: {err}"
                );
                notify(ConnectEvent::Failed {
                    provider,
                    message: err.to_string(),
                });
            }
        }
    }

    /// Single-shot completion check for a user who finished authorizing before
    /// the interval loop noticed. A negative answer is a normal result.
    pub async fn check_already_authorized(&self) -> AppResult<AlreadyAuthorized> {
        let (id, provider, token) = {
            let attempts = self.attempts.lock_or_recover();
            let attempt = attempts
                .current
                .as_ref()
                .ok_or_else(|| AppError::new("CONNECT_IDLE", "no pending connection attempt"))?;
            (attempt.id, attempt.provider, attempt.token.clone())
        };

        let completed = match self.backend.poll_completion(&token).await {
            Ok(done) => done,
            Err(err) => {
                // A failed on-demand check is a request failure: drop the attempt
                // so the user can restart cleanly.
                self.cancel_attempt(id);
                return Err(err);
            }
        };
        if !completed {
            return Ok(AlreadyAuthorized::NotYet);
        }
        if !self.enter_completing(id) {
            // The interval loop detected completion first and is finalizing.
            return Ok(AlreadyAuthorized::NotYet);
        }
        self.abort_poll_task(id);

        match self.reconcile_after_completion(provider).await {
            Ok((auth, confirmed)) => {
                self.clear_attempt(id);
                Ok(AlreadyAuthorized::Connected {
                    accounts: auth.count_for(provider),
                    confirmed,
                })
            }
            Err(err) => {
                self.clear_attempt(id);
                Err(err)
            }
        }
    }

    /// Drops the active attempt and stops its polling task. Safe to call when idle.
    pub fn cancel(&self) {
        let mut attempts = self.attempts.lock_or_recover();
        if let Some(attempt) = attempts.current.take() {
            if let Some(task) = attempt.poll_task {
                task.abort();
            }
            tracing::info!(provider = attempt.provider.as_str(), "connection attempt cancelled");
        }
    }

    /// One-shot auth-status re-fetch, committed as the latest snapshot.
    pub async fn refresh_auth_status(&self) -> AppResult<AuthStatus> {
        let status = self.backend.fetch_auth_status().await?;
        self.commit_auth(status.clone());
        Ok(status)
    }

    /// Unlinks every credential for `provider` and re-fetches the counts.
    pub async fn disconnect(&self, provider: Provider) -> AppResult<AuthStatus> {
        self.backend.disconnect_provider(provider).await?;
        tracing::info!(provider = provider.as_str(), "provider disconnected");
        self.refresh_auth_status().await
    }

    /// Submits a local credential file for a file-based provider, then
    /// re-fetches the counts. Bypasses the OAuth session entirely.
    pub async fn import_credential(&self, provider: Provider, path: &Path) -> AppResult<AuthStatus> {
        if provider.connection_kind() != ConnectionKind::CredentialFile {
            return Err(AppError::new(
                "SEC_INVALID_INPUT",
                format!(
                    "{} accounts are linked over OAuth, not credential import",
                    provider.display_name()
                ),
            ));
        }
        self.backend.import_credential_file(path).await?;
        tracing::info!(provider = provider.as_str(), "credential file imported");
        self.refresh_auth_status().await
    }

    /// Re-fetches account counts after a detected completion.
    ///
    /// The backend may persist the new credential after it signals completion,
    /// so the fetch waits out a settling delay and then retries while the count
    /// for `provider` has not strictly increased. The final snapshot is
    /// committed either way; the returned flag reports whether the increase was
    /// observed.
    async fn reconcile_after_completion(&self, provider: Provider) -> AppResult<(AuthStatus, bool)> {
        tokio::time::sleep(self.cfg.settle_delay).await;

        let before = self.auth_snapshot().count_for(provider);
        let backend = Arc::clone(&self.backend);
        let latest = retry_until(
            RetryPolicy {
                max_retries: self.cfg.refresh_retries,
                delay: self.cfg.refresh_retry_delay,
            },
            move || {
                let backend = Arc::clone(&backend);
                async move { backend.fetch_auth_status().await }
            },
            |status: &AuthStatus| status.count_for(provider) > before,
        )
        .await?;

        let confirmed = latest.count_for(provider) > before;
        if !confirmed {
            // Completion was reported by the backend; trust it over the count diff.
            tracing::warn!(
                provider = provider.as_str(),
                count = latest.count_for(provider),
                "account count did not increase after refresh retries"
            );
        }
        self.commit_auth(latest.clone());
        Ok((latest, confirmed))
    }

    fn commit_auth(&self, status: AuthStatus) {
        *self.auth.lock_or_recover() = status;
    }

    fn is_current(&self, id: u64) -> bool {
        self.attempts
            .lock_or_recover()
            .current
            .as_ref()
            .is_some_and(|attempt| attempt.id == id)
    }

    /// Clears the attempt if `id` is still the active one.
    fn clear_attempt(&self, id: u64) -> bool {
        let mut attempts = self.attempts.lock_or_recover();
        if attempts
            .current
            .as_ref()
            .is_some_and(|attempt| attempt.id == id)
        {
            attempts.current = None;
            return true;
        }
        false
    }

    /// Clears the attempt and aborts its polling task.
    fn cancel_attempt(&self, id: u64) {
        let mut attempts = self.attempts.lock_or_recover();
        if attempts
            .current
            .as_ref()
            .is_some_and(|attempt| attempt.id == id)
        {
            if let Some(attempt) = attempts.current.take() {
                if let Some(task) = attempt.poll_task {
                    task.abort();
                }
            }
        }
    }

    /// Marks the attempt as completing; only one caller wins the transition.
    fn enter_completing(&self, id: u64) -> bool {
        let mut attempts = self.attempts.lock_or_recover();
        match attempts.current.as_mut() {
            Some(attempt) if attempt.id == id && attempt.phase != ConnectPhase::Completing => {
                attempt.phase = ConnectPhase::Completing;
                true
            }
            _ => false,
        }
    }

    fn abort_poll_task(&self, id: u64) {
        let mut attempts = self.attempts.lock_or_recover();
        if let Some(attempt) = attempts.current.as_mut() {
            if attempt.id == id {
                if let Some(task) = attempt.poll_task.take() {
                    task.abort();
                }
            }
        }
    }
}
