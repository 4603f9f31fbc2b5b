//! Usage: Public test helpers for integration tests.

use std::path::PathBuf;

fn serialize_json(
    value: impl serde::Serialize,
) -> crate::shared::error::AppResult<serde_json::Value> {
    Ok(serde_json::to_value(value)
        .map_err(|e| format!("SYSTEM_ERROR: failed to serialize json: {e}"))?)
}

pub fn config_dir<R: tauri::Runtime>(
    app: &tauri::AppHandle<R>,
) -> crate::shared::error::AppResult<PathBuf> {
    crate::infra::app_paths::config_dir(app)
}

pub fn settings_path<R: tauri::Runtime>(
    app: &tauri::AppHandle<R>,
) -> crate::shared::error::AppResult<PathBuf> {
    crate::infra::app_paths::settings_path(app)
}

pub fn settings_read_json<R: tauri::Runtime>(
    app: &tauri::AppHandle<R>,
) -> crate::shared::error::AppResult<serde_json::Value> {
    let settings = crate::infra::settings::read(app)?;
    serialize_json(settings)
}

pub fn settings_write_json<R: tauri::Runtime>(
    app: &tauri::AppHandle<R>,
    value: serde_json::Value,
) -> crate::shared::error::AppResult<serde_json::Value> {
    let settings: crate::infra::settings::AppSettings = serde_json::from_value(value)
        .map_err(|e| format!("SEC_INVALID_INPUT: invalid settings json: {e}"))?;
    crate::infra::settings::write(app, &settings)?;
    let written = crate::infra::settings::read(app)?;
    serialize_json(written)
}
