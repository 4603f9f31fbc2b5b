//! Usage: Starts and stops the proxy sidecar process and reports its status.

use crate::infra::settings::{AppSettings, DEFAULT_PROXY_PORT};
use crate::proxy::ProxyStatus;
use crate::shared::error::{AppError, AppResult};
use std::process::{Child, Command, Stdio};

struct RunningProxy {
    port: u16,
    endpoint: String,
    child: Child,
}

#[derive(Default)]
pub struct ProxyManager {
    running: Option<RunningProxy>,
}

impl ProxyManager {
    pub fn status(&mut self) -> ProxyStatus {
        // Reap a sidecar that exited behind our back.
        if let Some(running) = self.running.as_mut() {
            match running.child.try_wait() {
                Ok(Some(exit)) => {
                    tracing::warn!(code = ?exit.code(), "proxy sidecar exited unexpectedly");
                    self.running = None;
                }
                Ok(None) => {}
                Err(err) => tracing::warn!("failed to query proxy sidecar state: {err}"),
            }
        }

        match &self.running {
            Some(running) => ProxyStatus {
                running: true,
                port: running.port,
                endpoint: running.endpoint.clone(),
            },
            None => ProxyStatus::default(),
        }
    }

    pub fn start(&mut self, settings: &AppSettings) -> AppResult<ProxyStatus> {
        if self.running.is_some() {
            return Ok(self.status());
        }

        let port = if settings.port > 0 {
            settings.port
        } else {
            DEFAULT_PROXY_PORT
        };

        let mut command = Command::new(&settings.proxy_binary);
        command
            .arg("--port")
            .arg(port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        if settings.debug {
            command.arg("--debug");
        }

        let child = command.spawn().map_err(|e| {
            AppError::new(
                "PROXY_SPAWN",
                format!("failed to start {}: {e}", settings.proxy_binary),
            )
        })?;

        tracing::info!(port, pid = child.id(), "proxy sidecar started");
        self.running = Some(RunningProxy {
            port,
            endpoint: format!("http://localhost:{port}/v1"),
            child,
        });
        Ok(self.status())
    }

    pub fn stop(&mut self) -> AppResult<ProxyStatus> {
        if let Some(mut running) = self.running.take() {
            if let Err(err) = running.child.kill() {
                tracing::warn!("failed to kill proxy sidecar: {err}");
            }
            let _ = running.child.wait();
            tracing::info!(port = running.port, "proxy sidecar stopped");
        }
        Ok(self.status())
    }

    /// Origin of the sidecar's management API; errors while the proxy is down.
    pub(crate) fn management_base_url(&mut self) -> AppResult<String> {
        let status = self.status();
        if !status.running {
            return Err(AppError::new("PROXY_NOT_RUNNING", "the proxy is not running"));
        }
        Ok(format!("http://localhost:{}", status.port))
    }
}
