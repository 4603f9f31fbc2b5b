//! Usage: Resolve app config/log directories (honors `PROXYPAL_CONFIG_DIR` for tests).

use crate::shared::error::{AppError, AppResult};
use std::path::PathBuf;
use tauri::Manager;

pub fn config_dir<R: tauri::Runtime>(app: &tauri::AppHandle<R>) -> AppResult<PathBuf> {
    let dir = match std::env::var("PROXYPAL_CONFIG_DIR") {
        Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
        _ => app.path().app_config_dir().map_err(|e| {
            AppError::new("SYSTEM_ERROR", format!("config dir unavailable: {e}"))
        })?,
    };
    std::fs::create_dir_all(&dir).map_err(|e| {
        AppError::new(
            "SYSTEM_ERROR",
            format!("failed to create config dir {}: {e}", dir.display()),
        )
    })?;
    Ok(dir)
}

pub fn settings_path<R: tauri::Runtime>(app: &tauri::AppHandle<R>) -> AppResult<PathBuf> {
    Ok(config_dir(app)?.join("config.json"))
}

pub fn log_dir<R: tauri::Runtime>(app: &tauri::AppHandle<R>) -> AppResult<PathBuf> {
    let dir = config_dir(app)?.join("logs");
    std::fs::create_dir_all(&dir).map_err(|e| {
        AppError::new(
            "SYSTEM_ERROR",
            format!("failed to create log dir {}: {e}", dir.display()),
        )
    })?;
    Ok(dir)
}
