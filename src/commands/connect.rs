//! Usage: Provider connection Tauri commands (OAuth flow, credential import, auth status).

use crate::app::app_state::{ConnectState, ProxyState};
use crate::domain::auth_status::AuthStatus;
use crate::domain::connect::{AlreadyAuthorized, ConnectEvent, SessionSnapshot};
use crate::domain::providers::{self, Provider, ProviderInfo};
use crate::shared::blocking;
use crate::shared::error::AppResult;
use crate::shared::mutex_ext::MutexExt;
use std::path::PathBuf;
use tauri::Emitter;

pub(crate) const CONNECT_PROGRESS_EVENT: &str = "connect:progress";

fn parse_provider(raw: &str) -> Result<Provider, String> {
    Provider::parse_strict(raw)
        .ok_or_else(|| format!("SEC_INVALID_INPUT: unknown provider: {raw}"))
}

#[tauri::command]
pub(crate) fn providers_list() -> Vec<ProviderInfo> {
    providers::catalog()
}

#[tauri::command]
pub(crate) async fn connect_begin(
    proxy: tauri::State<'_, ProxyState>,
    connect: tauri::State<'_, ConnectState>,
    provider: String,
) -> Result<SessionSnapshot, String> {
    let provider = parse_provider(&provider)?;
    let status = proxy.0.lock_or_recover().status();
    connect.0.begin(provider, &status).await.map_err(Into::into)
}

#[tauri::command]
pub(crate) async fn connect_authorize(
    app: tauri::AppHandle,
    connect: tauri::State<'_, ConnectState>,
) -> Result<(), String> {
    connect
        .0
        .start_authorization(move |event: ConnectEvent| {
            if let Err(err) = app.emit(CONNECT_PROGRESS_EVENT, &event) {
                tracing::debug!("emit connect progress failed: {err}");
            }
        })
        .await
        .map_err(Into::into)
}

#[tauri::command]
pub(crate) async fn connect_check_authorized(
    connect: tauri::State<'_, ConnectState>,
) -> Result<AlreadyAuthorized, String> {
    connect.0.check_already_authorized().await.map_err(Into::into)
}

#[tauri::command]
pub(crate) fn connect_cancel(connect: tauri::State<'_, ConnectState>) {
    connect.0.cancel();
}

#[tauri::command]
pub(crate) fn connect_session_get(
    connect: tauri::State<'_, ConnectState>,
) -> Option<SessionSnapshot> {
    connect.0.session()
}

#[tauri::command]
pub(crate) fn auth_status_get(connect: tauri::State<'_, ConnectState>) -> AuthStatus {
    connect.0.auth_snapshot()
}

#[tauri::command]
pub(crate) async fn auth_status_refresh(
    connect: tauri::State<'_, ConnectState>,
) -> Result<AuthStatus, String> {
    connect.0.refresh_auth_status().await.map_err(Into::into)
}

#[tauri::command]
pub(crate) async fn provider_disconnect(
    connect: tauri::State<'_, ConnectState>,
    provider: String,
) -> Result<AuthStatus, String> {
    let provider = parse_provider(&provider)?;
    connect.0.disconnect(provider).await.map_err(Into::into)
}

#[tauri::command]
pub(crate) async fn vertex_credential_import(
    connect: tauri::State<'_, ConnectState>,
    path: String,
) -> Result<AuthStatus, String> {
    let path = PathBuf::from(path);
    blocking::run("vertex_credential_validate", {
        let path = path.clone();
        move || -> AppResult<()> {
            if !path.is_file() {
                return Err(format!(
                    "SEC_INVALID_INPUT: credential file not found: {}",
                    path.display()
                )
                .into());
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                return Err(
                    "SEC_INVALID_INPUT: service account credentials must be a .json file".into(),
                );
            }
            Ok(())
        }
    })
    .await?;

    connect
        .0
        .import_credential(Provider::Vertex, &path)
        .await
        .map_err(Into::into)
}
