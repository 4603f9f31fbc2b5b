mod app;
mod commands;
mod domain;
mod infra;
mod proxy;
mod shared;
pub mod test_support;

use app::app_state::{self, ConnectState, ProxyState};
use commands::*;
use infra::settings;
use shared::mutex_ext::MutexExt;
use tauri::{Emitter, Manager};

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let (proxy_state, bridge_state, connect_state) =
        app_state::build().expect("failed to initialize application state");

    let app = tauri::Builder::default()
        .manage(proxy_state)
        .manage(bridge_state)
        .manage(connect_state)
        .setup(|app| {
            app::logging::init(app.handle());

            // Global panic hook: panics land in the on-disk log for post-mortem diagnosis.
            std::panic::set_hook(Box::new(|panic_info| {
                let location = panic_info
                    .location()
                    .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
                    .unwrap_or_else(|| "unknown".to_string());
                tracing::error!(location = %location, "PANIC: application panicked at {location}");
            }));

            let app_handle = app.handle().clone();
            tauri::async_runtime::spawn(async move {
                let settings = match shared::blocking::run("startup_read_settings", {
                    let app_handle = app_handle.clone();
                    move || settings::read(&app_handle)
                })
                .await
                {
                    Ok(cfg) => cfg,
                    Err(err) => {
                        tracing::warn!("settings unreadable at startup, using defaults: {err}");
                        settings::AppSettings::default()
                    }
                };

                if !settings.auto_start {
                    return;
                }

                let status = {
                    let state = app_handle.state::<ProxyState>();
                    let mut manager = state.0.lock_or_recover();
                    manager.start(&settings)
                };
                match status {
                    Ok(status) => {
                        let _ = app_handle.emit(commands::proxy::PROXY_STATUS_EVENT, &status);
                    }
                    Err(err) => tracing::error!("proxy auto-start failed: {err}"),
                }
            });

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            settings_get,
            settings_set,
            proxy_start,
            proxy_stop,
            proxy_status,
            providers_list,
            connect_begin,
            connect_authorize,
            connect_check_authorized,
            connect_cancel,
            connect_session_get,
            auth_status_get,
            auth_status_refresh,
            provider_disconnect,
            vertex_credential_import
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(|app_handle, event| {
        if let tauri::RunEvent::ExitRequested { .. } = &event {
            // No polling interval may outlive the dashboard: drop any active
            // connection attempt, then take the sidecar down with us.
            app_handle.state::<ConnectState>().0.cancel();
            let proxy = app_handle.state::<ProxyState>();
            let mut manager = proxy.0.lock_or_recover();
            if let Err(err) = manager.stop() {
                tracing::warn!("failed to stop proxy on exit: {err}");
            }
        }
    });
}
