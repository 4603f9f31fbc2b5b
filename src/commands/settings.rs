//! Usage: Settings Tauri commands.

use crate::infra::settings::{self, AppSettings};
use crate::shared::blocking;

#[tauri::command]
pub(crate) async fn settings_get(app: tauri::AppHandle) -> Result<AppSettings, String> {
    blocking::run("settings_read", move || settings::read(&app))
        .await
        .map_err(Into::into)
}

#[tauri::command]
pub(crate) async fn settings_set(
    app: tauri::AppHandle,
    settings: AppSettings,
) -> Result<AppSettings, String> {
    blocking::run("settings_write", move || {
        settings::write(&app, &settings)?;
        settings::read(&app)
    })
    .await
    .map_err(Into::into)
}
