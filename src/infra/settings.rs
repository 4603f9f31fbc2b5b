//! Usage: Persisted application settings (schema + read/write helpers).

use crate::infra::app_paths;
use crate::shared::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PROXY_PORT: u16 = 8317;
const DEFAULT_PROXY_BINARY: &str = "cli-proxy-api";
const DEFAULT_PROXY_API_KEY: &str = "proxypal-local";

/// Settings persisted to `config.json` (camelCase on disk, matching what the
/// frontend reads).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub port: u16,
    pub auto_start: bool,
    pub launch_at_login: bool,
    pub debug: bool,
    pub proxy_binary: String,
    pub request_retry: u16,
    pub close_to_tray: bool,
    pub proxy_api_key: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PROXY_PORT,
            auto_start: true,
            launch_at_login: false,
            debug: false,
            proxy_binary: DEFAULT_PROXY_BINARY.to_string(),
            request_retry: 0,
            close_to_tray: true,
            proxy_api_key: DEFAULT_PROXY_API_KEY.to_string(),
        }
    }
}

pub fn read<R: tauri::Runtime>(app: &tauri::AppHandle<R>) -> AppResult<AppSettings> {
    let path = app_paths::settings_path(app)?;
    if !path.exists() {
        return Ok(AppSettings::default());
    }
    let data = std::fs::read_to_string(&path)
        .map_err(|e| AppError::new("SYSTEM_ERROR", format!("failed to read settings: {e}")))?;
    match serde_json::from_str(&data) {
        Ok(settings) => Ok(settings),
        Err(err) => {
            tracing::warn!("settings file unreadable, falling back to defaults: {err}");
            Ok(AppSettings::default())
        }
    }
}

pub fn write<R: tauri::Runtime>(
    app: &tauri::AppHandle<R>,
    settings: &AppSettings,
) -> AppResult<()> {
    if settings.port == 0 {
        return Err(AppError::new("SEC_INVALID_INPUT", "port must be > 0"));
    }
    if settings.proxy_binary.trim().is_empty() {
        return Err(AppError::new(
            "SEC_INVALID_INPUT",
            "proxy binary must not be empty",
        ));
    }

    let path = app_paths::settings_path(app)?;
    let data = serde_json::to_string_pretty(settings)
        .map_err(|e| AppError::new("SYSTEM_ERROR", format!("failed to serialize settings: {e}")))?;
    std::fs::write(&path, data)
        .map_err(|e| AppError::new("SYSTEM_ERROR", format!("failed to write settings: {e}")))?;
    Ok(())
}
