//! Usage: Proxy sidecar lifecycle Tauri commands.

use crate::app::app_state::{BridgeState, ProxyState};
use crate::infra::settings;
use crate::proxy::ProxyStatus;
use crate::shared::mutex_ext::MutexExt;
use crate::shared::retry::{retry_until, RetryPolicy};
use std::sync::Arc;
use std::time::Duration;
use tauri::Emitter;

pub(crate) const PROXY_STATUS_EVENT: &str = "proxy:status";

const READY_PROBE_RETRIES: u32 = 10;
const READY_PROBE_DELAY: Duration = Duration::from_millis(300);

#[tauri::command]
pub(crate) async fn proxy_start(
    app: tauri::AppHandle,
    proxy: tauri::State<'_, ProxyState>,
    bridge: tauri::State<'_, BridgeState>,
) -> Result<ProxyStatus, String> {
    let settings = settings::read(&app)?;
    let status = proxy.0.lock_or_recover().start(&settings)?;

    // Give the sidecar a moment to accept connections; start is still reported
    // as success when the probe stays negative, the UI shows health separately.
    let probe_bridge = Arc::clone(&bridge.0);
    let ready = retry_until(
        RetryPolicy {
            max_retries: READY_PROBE_RETRIES,
            delay: READY_PROBE_DELAY,
        },
        move || {
            let bridge = Arc::clone(&probe_bridge);
            async move { bridge.probe_health().await }
        },
        |ready: &bool| *ready,
    )
    .await
    .unwrap_or(false);
    if !ready {
        tracing::warn!(port = status.port, "proxy management api did not answer the readiness probe");
    }

    let _ = app.emit(PROXY_STATUS_EVENT, &status);
    Ok(status)
}

#[tauri::command]
pub(crate) fn proxy_stop(
    app: tauri::AppHandle,
    proxy: tauri::State<'_, ProxyState>,
) -> Result<ProxyStatus, String> {
    let status = proxy.0.lock_or_recover().stop()?;
    let _ = app.emit(PROXY_STATUS_EVENT, &status);
    Ok(status)
}

#[tauri::command]
pub(crate) fn proxy_status(proxy: tauri::State<'_, ProxyState>) -> ProxyStatus {
    proxy.0.lock_or_recover().status()
}
